//! String transformation utilities for generated class names, file names and
//! template context keys

/// Upper-case the first character, leaving the rest untouched
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Convert an underscored identifier to UpperCamelCase (`featured_items` -> `FeaturedItems`)
///
/// Only the first letter of each part is touched, so `my_fooBar` becomes `MyFooBar`.
pub fn uscore_to_camel_case(s: &str) -> String {
    s.split('_').map(ucfirst).collect()
}

/// Convert an underscored identifier to Upper_Underscore (`featured_items` -> `Featured_Items`)
pub fn uscore_to_upper_uscore(s: &str) -> String {
    s.split('_').map(ucfirst).collect::<Vec<_>>().join("_")
}

/// Convert a kebab-case option name to lowerCamelCase (`server-admin` -> `serverAdmin`)
pub fn kebab_to_lower_camel_case(s: &str) -> String {
    let mut parts = s.split('-');
    let mut result = parts.next().unwrap_or_default().to_string();
    for part in parts {
        result.push_str(&ucfirst(part));
    }
    result
}
