//! Cross-crate tests of the pipeline, driven by a scripted tool runner.

pub mod support;

#[cfg(test)]
mod pipeline;
