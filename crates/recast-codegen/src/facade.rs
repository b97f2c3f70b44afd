//! One-call entry point: optimize once, generate for both libraries

use crate::backends::{Playwright, Puppeteer};
use crate::generator::Generator;
use crate::optimizer::optimize;
use crate::options::GeneratorOptions;
use recast_events::Event;
use serde::Serialize;

/// Both scripts plus the event list they were generated from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub puppeteer: String,
    pub playwright: String,
    pub optimized_recording: Vec<Event>,
}

impl GeneratedCode {
    /// Scripts as `(library, source)` pairs in presentation order
    pub fn ordered(&self, playwright_first: bool) -> [(&'static str, &str); 2] {
        let puppeteer = ("puppeteer", self.puppeteer.as_str());
        let playwright = ("playwright", self.playwright.as_str());
        if playwright_first {
            [playwright, puppeteer]
        } else {
            [puppeteer, playwright]
        }
    }
}

pub struct CodeGenerator {
    puppeteer: Generator<Puppeteer>,
    playwright: Generator<Playwright>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            puppeteer: Generator::new(Puppeteer, options.clone()),
            playwright: Generator::new(Playwright, options),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        self.playwright.options()
    }

    pub fn generate(&self, recording: &[Event]) -> GeneratedCode {
        let optimized_recording = optimize(recording);
        GeneratedCode {
            puppeteer: self.puppeteer.generate(&optimized_recording),
            playwright: self.playwright.generate(&optimized_recording),
            optimized_recording,
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
