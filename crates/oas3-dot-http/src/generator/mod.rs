pub mod cursor;
pub mod descriptor;
pub mod document;
pub mod example;
pub mod host;
pub mod layout;
pub mod metrics;
pub mod modules;
pub(crate) mod naming;
pub mod orchestrator;
pub mod queue;
pub mod run;
pub mod synthetics;
pub mod types;

#[cfg(test)]
mod tests;
