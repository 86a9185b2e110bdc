//! Cross-crate discovery scenarios driven through fake probers and scanners.

#[cfg(test)]
mod discovery;
