use shopgrab_core::Platform;

use super::{base_session, PlatformProfile};
use crate::extractor::{CurrencySymbols, Field, FieldRule, Shape};
use crate::locator::Locator::{Css, XPath};

const MAIN_PRICE: &str = "div.product-intro__head-mainprice div.original span";

const CURRENCY: CurrencySymbols = CurrencySymbols {
    symbols: &['$', '€', '£', '¥'],
    run: false,
};

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Field::Title, Css("h1.product-intro__head-name"), Shape::Text),
    FieldRule::new(Field::Brand, Css("div.sc-320c5568-17.jvojBZ"), Shape::Text),
    FieldRule::new(
        Field::Image,
        Css("div.product-intro__thumbs-inner div.product-intro__thumbs-item img"),
        Shape::Text,
    )
    .attribute("src"),
    FieldRule::new(Field::Price, Css(MAIN_PRICE), Shape::Price),
    FieldRule::new(Field::Currency, Css(MAIN_PRICE), Shape::Currency(CURRENCY)),
    FieldRule::new(
        Field::Specifications,
        Css("div.product-intro__attr-wrap div.product-intro__description-table-item"),
        Shape::Joined,
    ),
    FieldRule::new(
        Field::Measurements,
        Css("div.product-intro__size-choose.fsp-element div.product-intro__size-radio"),
        Shape::Joined,
    ),
    FieldRule::new(
        Field::Estimator,
        XPath(r#"//p[contains(@class, "product-intro__freeshipping-time")]"#),
        Shape::Text,
    ),
    FieldRule::new(
        Field::Model,
        XPath(r#"//div[@class="product-intro__head-sku"]//font[contains(text(), "SKU:")]"#),
        Shape::StripPrefix("SKU: "),
    ),
    FieldRule::new(
        Field::ShippingPrice,
        XPath(r#"//div[@class="shipping-price"]"#),
        Shape::Price,
    ),
];

pub(super) fn profile() -> PlatformProfile {
    let mut session = base_session();
    // Quote prices in dirhams regardless of the storefront's geo guess.
    session
        .extra_headers
        .push(("Accept-Currency".to_string(), "AED".to_string()));

    PlatformProfile {
        platform: Platform::Shein,
        session,
        fields: FIELDS,
    }
}
