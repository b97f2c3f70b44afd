//! Playwright script backend

use crate::generator::Backend;
use crate::options::GeneratorOptions;

const IMPORT: &str = "const { chromium } = require('playwright');";

const HEADER: &str = "const browser = await chromium.launch()
const context = await browser.newContext()
let page = await context.newPage()";

const FOOTER: &str = "await browser.close()";

#[derive(Debug, Clone, Copy, Default)]
pub struct Playwright;

impl Backend for Playwright {
    fn name(&self) -> &'static str {
        "playwright"
    }

    fn import(&self) -> &'static str {
        IMPORT
    }

    fn header(&self) -> &'static str {
        HEADER
    }

    fn footer(&self) -> &'static str {
        FOOTER
    }

    fn viewport(&self, frame: &str, width: u32, height: u32) -> String {
        format!(
            "await {}.setViewportSize({{ width: {}, height: {} }})",
            frame, width, height
        )
    }

    fn select_option(&self, frame: &str, selector: &str, value: &str) -> String {
        format!("await {}.selectOption('{}', '{}')", frame, selector, value)
    }

    fn after_click(&self, options: &GeneratorOptions) -> Option<String> {
        options
            .wait_for_network_idle_after_click
            .then(|| "await page.waitForLoadState('networkidle')".to_string())
    }
}
