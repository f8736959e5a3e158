//! Display metadata for transaction categories.
//!
//! Categories are free text at the storage level; this module only maps the
//! suggested set to display icons for clients that render them.

/// The suggested transaction categories and their display icon names.
pub const CATEGORY_ICONS: [(&str, &str); 7] = [
    ("Food & Drinks", "fast-food"),
    ("Shopping", "cart"),
    ("Transportation", "car"),
    ("Entertainment", "film"),
    ("Bills", "receipt"),
    ("Income", "cash"),
    ("Other", "ellipsis-horizontal"),
];

/// The icon used for categories without an entry in [CATEGORY_ICONS].
pub const FALLBACK_ICON: &str = "pricetag-outline";

/// Look up the display icon for a category.
///
/// Unrecognized categories fall back to [FALLBACK_ICON] rather than failing,
/// since storage does not constrain category names to the suggested set.
pub fn icon_for_category(category: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON)
}
