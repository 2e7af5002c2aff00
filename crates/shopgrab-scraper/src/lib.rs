pub mod cdp;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod locator;
pub mod page;
pub mod platforms;
pub mod shape;
pub mod static_html;

pub use cdp::CdpSessionProvider;
pub use error::{BrowserError, FieldError, ScraperError};
pub use extractor::{run_battery, ExtractionReport, Field, FieldOutcome, FieldRule, Shape};
pub use handler::{Extraction, ProductScraper};
pub use locator::{Capture, Locator};
pub use page::{BrowserSession, Geolocation, Page, SessionOptions, SessionProvider};
pub use platforms::{profile_for, PlatformProfile};
pub use static_html::StaticHtmlProvider;
