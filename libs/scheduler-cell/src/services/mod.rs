pub mod client;

pub use client::SchedulerApiClient;
