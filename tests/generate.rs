use recast::prelude::*;
use regex::Regex;

const SESSION: &str = r#"[
  {"action":"VIEWPORT","value":{"width":1440,"height":900}},
  {"action":"GOTO","href":"https://example.com/","frameId":0},
  {"action":"click","selector":".form-control","tagName":"INPUT","frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":null,"value":""},
  {"action":"keydown","selector":".form-control","tagName":"INPUT","frameId":0,"frameUrl":"https://example.com/","keyCode":229,"key":"Process","value":""},
  {"action":"keydown","selector":".form-control","tagName":"INPUT","frameId":0,"frameUrl":"https://example.com/","keyCode":84,"key":"t","value":""},
  {"action":"keydown","selector":".form-control","tagName":"INPUT","frameId":0,"frameUrl":"https://example.com/","keyCode":89,"key":"y","value":"t"},
  {"action":"keydown","selector":".form-control","tagName":"INPUT","frameId":0,"frameUrl":"https://example.com/","keyCode":13,"key":"Enter","value":"ty"},
  {"action":"click","selector":".no-underline","tagName":"A","frameId":0,"frameUrl":"https://example.com/","href":"https://example.com/"},
  {"action":"NAVIGATION","frameId":null,"frameUrl":null},
  {"action":"NAVIGATION","frameId":null,"frameUrl":null},
  {"action":"SCREENSHOT"}
]"#;

fn session() -> Recording {
    Recording::from_json("session", SESSION).unwrap()
}

#[test]
fn optimizes_recorded_session() {
    let code = CodeGenerator::new().generate(&session().events);
    let actions: Vec<&Action> = code.optimized_recording.iter().map(|e| &e.action).collect();
    assert_eq!(
        actions,
        vec![
            &Action::Viewport,
            &Action::Goto,
            &Action::Click,
            &Action::Fill,
            &Action::Keydown,
            &Action::Click,
            &Action::Navigation,
            &Action::Screenshot,
        ]
    );
    assert_eq!(
        code.optimized_recording[3].value,
        Some(EventValue::Text("ty".into()))
    );
}

/// Keystrokes recorded with `keyCode` only, as older extension builds do
const CODED_SESSION: &str = r#"[
  {"action":"click","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":null,"selector":".form-control","tagName":"INPUT","value":""},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":""},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":"t"},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":"t'y"},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":"t'y'p"},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":"t'y'pe"},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":229,"selector":".form-control","tagName":"INPUT","value":"types"},
  {"action":"keydown","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":null,"keyCode":13,"selector":".form-control","tagName":"INPUT","value":"types"},
  {"action":"click","coordinates":null,"frameId":0,"frameUrl":"https://example.com/","href":"https://example.com/","keyCode":null,"selector":".no-underline","tagName":"A"},
  {"action":"NAVIGATION","frameId":null,"frameUrl":null},
  {"action":"NAVIGATION","frameId":null,"frameUrl":null}
]"#;

#[test]
fn key_code_session_keeps_enter() {
    let recording = Recording::from_json("coded", CODED_SESSION).unwrap();
    let code = CodeGenerator::new().generate(&recording.events);

    let optimized = &code.optimized_recording;
    let actions: Vec<&Action> = optimized.iter().map(|e| &e.action).collect();
    assert_eq!(
        actions,
        vec![
            &Action::Click,
            &Action::Fill,
            &Action::Keydown,
            &Action::Click,
            &Action::Navigation,
        ]
    );
    assert_eq!(optimized[0], recording.events[0]);
    assert_eq!(optimized[1].value, Some(EventValue::Text("types".into())));
    assert_eq!(optimized[2], recording.events[7]);
    assert_eq!(optimized[3], recording.events[8]);
    assert_eq!(optimized[4], recording.events[9]);

    for script in [&code.puppeteer, &code.playwright] {
        assert!(script.contains("await page.fill('.form-control', 'types')\n"));
        assert!(script.contains("await page.keyboard.press('Enter')\n"));
    }
}

#[test]
fn playwright_script() {
    let options = GeneratorOptions {
        blank_lines_between_blocks: false,
        ..Default::default()
    };
    let code = CodeGenerator::with_options(options).generate(&session().events);
    assert_eq!(
        code.playwright,
        "const { chromium } = require('playwright');
const browser = await chromium.launch()
const context = await browser.newContext()
let page = await context.newPage()
const navigationPromise = page.waitForNavigation()
await page.setViewportSize({ width: 1440, height: 900 })
await page.goto('https://example.com/')
await page.waitForSelector('.form-control')
await page.click('.form-control')
await page.fill('.form-control', 'ty')
await page.keyboard.press('Enter')
await page.waitForSelector('.no-underline')
await page.click('.no-underline')
await navigationPromise
await page.screenshot({ path: 'screenshot_1.png', fullPage: true })
await browser.close()
"
    );
}

#[test]
fn optimizer_output_is_stable() {
    let once = optimize(&session().events);
    assert_eq!(optimize(&once), once);
}

#[test]
fn typed_quotes_and_backslashes_survive() {
    let typed = r"it's C:\temp\'x";
    let events = vec![Event::new(Action::Keydown)
        .selector("#path")
        .tag_name("INPUT")
        .value(typed)];
    let code = CodeGenerator::new().generate(&events);

    let re = Regex::new(r"fill\('#path', '((?:[^'\\]|\\.)*)'\)").unwrap();
    let unescape = Regex::new(r"\\(.)").unwrap();
    for script in [&code.puppeteer, &code.playwright] {
        let caps = re.captures(script).expect("fill line");
        assert_eq!(unescape.replace_all(&caps[1], "$1"), typed);
    }
}

#[test]
fn iframe_and_popup_flow() {
    let events = vec![
        Event::new(Action::Goto).href("https://example.com/"),
        Event::new(Action::Click)
            .selector("button.pay")
            .frame(9, "https://pay.example.com/widget"),
        Event::new(Action::TabCreate).value(31),
        Event::new(Action::TabChange).value(31),
        Event::new(Action::Click).selector("#done").frame(9, "https://pay.example.com/widget"),
    ];
    let script = CodeGenerator::new().generate(&events).puppeteer;

    assert_eq!(script.matches("const frame_9 = ").count(), 1);
    let declared = script.find("const frame_9 = ").unwrap();
    let first_use = script.find("frame_9.waitForSelector('button.pay')").unwrap();
    assert!(declared < first_use);
    assert!(script.contains("    frame_9.click('button.pay'),\n"));
    assert!(script.contains("page = context.pages()[1]\nawait page.bringToFront()"));
}
