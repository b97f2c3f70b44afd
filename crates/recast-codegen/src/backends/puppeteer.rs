//! Puppeteer script backend

use crate::generator::Backend;

const IMPORT: &str = "const puppeteer = require('puppeteer');";

const HEADER: &str = "const browser = await puppeteer.launch()
const context = browser.defaultBrowserContext()
let page = await context.newPage()";

const FOOTER: &str = "await browser.close()";

#[derive(Debug, Clone, Copy, Default)]
pub struct Puppeteer;

impl Backend for Puppeteer {
    fn name(&self) -> &'static str {
        "puppeteer"
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
        format!("await {}.setViewport({{ width: {}, height: {} }})", frame, width, height)
    }

    fn select_option(&self, frame: &str, selector: &str, value: &str) -> String {
        format!("await {}.select('{}', '{}')", frame, selector, value)
    }
}
