//! Cross-crate tests exercising the compiler, runtime and streaming driver
//! together.

#[cfg(test)]
mod end_to_end;
#[cfg(test)]
mod streaming_equivalence;
