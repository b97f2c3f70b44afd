//! Concrete script generators

pub mod playwright;
pub mod puppeteer;

pub use playwright::Playwright;
pub use puppeteer::Puppeteer;
