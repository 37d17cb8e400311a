pub mod constants;
pub mod templates;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod urls;
pub mod validation;
