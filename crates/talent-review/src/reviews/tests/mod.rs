mod common;
mod goals;
mod report;
mod scoring;
