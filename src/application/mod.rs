pub mod errors;
pub mod hierarchy;
pub mod ordering;
pub mod pagination;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;
