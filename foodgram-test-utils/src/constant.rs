//! Constant values shared by fixtures and tests.

/// Plain-text password every fixture user is created with.
pub static TEST_PASSWORD: &str = "Sup3r-secret-pass";

/// Color assigned to fixture tags.
pub static TEST_TAG_COLOR: &str = "#49B64E";

/// Relative image path stored on fixture recipes.
pub static TEST_IMAGE_PATH: &str = "recipes/fixture.png";
