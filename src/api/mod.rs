pub mod client;
pub mod traits;
pub mod wiki;

pub use client::HypixelClient;
pub use traits::GameApi;
pub use wiki::WikiClient;
