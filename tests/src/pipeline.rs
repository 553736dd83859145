mod integration;
mod targets;
