use shopgrab_core::Platform;

use super::{base_session, PlatformProfile};
use crate::extractor::{CurrencySymbols, Field, FieldRule, Shape};
use crate::locator::Locator::Css;

const PRICE_NOW: &str = r#"div.priceNow[data-qa="div-price-now"]"#;

const CURRENCY: CurrencySymbols = CurrencySymbols {
    symbols: &['$', '£', '€', '¥', '₹', '₩'],
    run: true,
};

/// noon renders the price node as a bare number; anything else (e.g. a
/// price range or "AED" prefix) is treated as no price.
const FIELDS: &[FieldRule] = &[
    FieldRule::new(Field::Title, Css(".sc-320c5568-18"), Shape::Text),
    FieldRule::new(Field::Brand, Css("div.sc-320c5568-17.jvojBZ"), Shape::Text),
    FieldRule::new(Field::Image, Css("div.sc-d8caf424-2.fJBKzl img"), Shape::Text)
        .attribute("src"),
    FieldRule::new(Field::Price, Css(PRICE_NOW), Shape::BarePrice),
    FieldRule::new(Field::Currency, Css(PRICE_NOW), Shape::Currency(CURRENCY)),
    FieldRule::new(
        Field::Specifications,
        Css("div.sc-966c8510-0.jLcJyt"),
        Shape::Joined,
    ),
    FieldRule::new(Field::Highlights, Css("div.sc-97eb4126-1.iMnGaT"), Shape::Joined),
    FieldRule::new(Field::Estimator, Css("div.estimator_first"), Shape::Text),
    FieldRule::new(Field::Model, Css("div.modelNumber"), Shape::Text),
    FieldRule::new(
        Field::ShippingPrice,
        Css(
            r#"div[data-pl="product-shipping"] div.dynamic-shipping div.dynamic-shipping-line.dynamic-shipping-titleLayout span strong"#,
        ),
        Shape::Price,
    ),
];

pub(super) fn profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Noon,
        session: base_session(),
        fields: FIELDS,
    }
}
