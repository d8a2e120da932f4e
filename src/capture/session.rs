//! Headless-Chromium session speaking the loc tool's capture protocol.
//!
//! The page exposes `$.capture.load / begin / isolate`; everything here is
//! a thin CDP wrapper around those calls plus clipped screenshots. Calls
//! that return objects are JSON-stringified in the page and deserialized
//! with serde_json, because CDP hands non-primitive values back by
//! reference.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page, DOM};
use headless_chrome::{Browser, LaunchOptions};

use crate::error::PackError;
use crate::models::CaptureManifest;

/// How often the resource barrier re-polls the page.
const RESOURCE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A headless browser tab with the loc tool page loaded.
pub struct CaptureSession {
    /// Keeps the browser process alive for the lifetime of the session.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl CaptureSession {
    /// Launch a headless browser and open the loc tool page.
    pub fn launch(tool_url: &str) -> Result<Self, PackError> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| PackError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| PackError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| PackError::Browser(format!("Failed to create tab: {}", e)))?;

        // Isolated elements sit on an empty page; screenshots must see
        // transparency there, not Chromium's default white.
        tab.call_method(Emulation::SetDefaultBackgroundColorOverride {
            color: Some(DOM::RGBA {
                r: 0,
                g: 0,
                b: 0,
                a: Some(0.0),
            }),
        })
        .map_err(|e| PackError::Browser(format!("Failed to override background: {}", e)))?;

        tab.navigate_to(tool_url)
            .map_err(|e| PackError::Browser(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| PackError::Browser(format!("Wait for navigation failed: {}", e)))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Hand the localization CSV to the page loader.
    pub fn load_manifest(&self, csv: &str) -> Result<(), PackError> {
        let expr = format!("$.capture.load({})", serde_json::to_string(csv)?);
        let value = self.eval_json(&expr)?;
        Self::check_protocol_error(&value, "load")?;
        Ok(())
    }

    /// Start the capture and fetch the manifest of images and data files.
    pub fn begin(&self, scale: u32, make_fonts: bool) -> Result<CaptureManifest, PackError> {
        let expr = format!("$.capture.begin({}, {})", scale, make_fonts);
        let value = self.eval_json(&expr)?;
        Self::check_protocol_error(&value, "begin")?;
        Ok(serde_json::from_value(value)?)
    }

    /// Isolate one DOM element so it is the only visible content.
    pub fn isolate(&self, image_id: &str) -> Result<(), PackError> {
        let expr = format!("$.capture.isolate({})", serde_json::to_string(image_id)?);
        self.tab
            .evaluate(&expr, false)
            .map_err(|e| PackError::Browser(format!("Isolate {} failed: {}", image_id, e)))?;
        Ok(())
    }

    /// Screenshot the top-left `width` x `height` viewport region as PNG.
    pub fn screenshot(&self, width: u32, height: u32) -> Result<Vec<u8>, PackError> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: width as f64,
            height: height as f64,
            scale: 1.0,
        };

        self.tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| PackError::Browser(format!("Screenshot failed: {}", e)))
    }

    /// Fetch a resource through the page context.
    ///
    /// Returns `None` when the response is not OK (missing baked images are
    /// routine). Bytes cross the CDP boundary as base64.
    pub fn fetch_binary(&self, url: &str) -> Result<Option<Vec<u8>>, PackError> {
        let expr = format!(
            r#"(async () => {{
                const response = await fetch({url});
                if (!response.ok) return null;
                const bytes = new Uint8Array(await response.arrayBuffer());
                let binary = "";
                for (let i = 0; i < bytes.length; i++) {{
                    binary += String.fromCharCode(bytes[i]);
                }}
                return btoa(binary);
            }})()"#,
            url = serde_json::to_string(url)?
        );

        let result = self
            .tab
            .evaluate(&expr, true)
            .map_err(|e| PackError::Browser(format!("Fetch of {} failed: {}", url, e)))?;

        match result.value {
            Some(serde_json::Value::String(b64)) => {
                let bytes = BASE64.decode(b64).map_err(|e| {
                    PackError::Protocol(format!("invalid base64 from page fetch of {}: {}", url, e))
                })?;
                Ok(Some(bytes))
            }
            _ => Ok(None),
        }
    }

    /// Block until the page has finished loading its resources.
    ///
    /// Polls `document.readyState` and image completion until `timeout`
    /// expires; capture must not start while the page is still pulling
    /// sprites or fonts.
    pub fn wait_for_resources(&self, timeout: Duration) -> Result<(), PackError> {
        let deadline = Instant::now() + timeout;
        let probe = "document.readyState === 'complete' \
                     && Array.from(document.images).every((img) => img.complete)";

        loop {
            let result = self
                .tab
                .evaluate(probe, false)
                .map_err(|e| PackError::Browser(format!("Resource probe failed: {}", e)))?;

            if matches!(result.value, Some(serde_json::Value::Bool(true))) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PackError::Browser(format!(
                    "page resources still loading after {:?}",
                    timeout
                )));
            }
            thread::sleep(RESOURCE_POLL_INTERVAL);
        }
    }

    /// Evaluate an expression and return its result as JSON.
    ///
    /// The expression is awaited and stringified in the page; `undefined`
    /// comes back as `Null`.
    fn eval_json(&self, expression: &str) -> Result<serde_json::Value, PackError> {
        let wrapped = format!("(async () => JSON.stringify(await ({})))()", expression);
        let result = self
            .tab
            .evaluate(&wrapped, true)
            .map_err(|e| PackError::Browser(format!("Evaluation failed: {}", e)))?;

        match result.value {
            Some(serde_json::Value::String(s)) => Ok(serde_json::from_str(&s)?),
            _ => Ok(serde_json::Value::Null),
        }
    }

    /// Map a `{error: "..."}` protocol envelope to a fatal error.
    fn check_protocol_error(value: &serde_json::Value, what: &str) -> Result<(), PackError> {
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return Err(PackError::Protocol(format!("{}: {}", what, message)));
        }
        Ok(())
    }
}
