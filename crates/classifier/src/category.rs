use context_protocol::{ClassifiedElement, ElementCategory, FileCategory};

/// Element categories that decide a file category, highest first
const ELEMENT_PRIORITY: &[(ElementCategory, FileCategory)] = &[
    (ElementCategory::Endpoint, FileCategory::Endpoint),
    (ElementCategory::Middleware, FileCategory::Middleware),
    (ElementCategory::Model, FileCategory::Model),
    (ElementCategory::Service, FileCategory::Service),
    (ElementCategory::Component, FileCategory::Component),
    (ElementCategory::ConfigObject, FileCategory::Config),
];

/// Path fragments consulted when no element decides
const PATH_HINTS: &[(&str, FileCategory)] = &[
    ("test", FileCategory::Test),
    ("spec", FileCategory::Test),
    ("util", FileCategory::Utility),
    ("helper", FileCategory::Utility),
];

/// Single category of a file from its elements, then its path
pub fn resolve_file_category(path: &str, elements: &[ClassifiedElement]) -> FileCategory {
    for (element, file) in ELEMENT_PRIORITY {
        if elements.iter().any(|e| e.category() == *element) {
            return *file;
        }
    }

    let lowered = path.to_ascii_lowercase();
    PATH_HINTS
        .iter()
        .find(|(hint, _)| lowered.contains(hint))
        .map_or(FileCategory::Utility, |(_, category)| *category)
}
