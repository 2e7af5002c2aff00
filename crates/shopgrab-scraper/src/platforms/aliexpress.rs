use shopgrab_core::Platform;

use super::{base_session, PlatformProfile};
use crate::extractor::{Field, FieldRule, Shape};
use crate::locator::Locator::{Css, XPath};

/// The currency symbol has its own node, so it is read verbatim rather than
/// matched against an allow-list.
const FIELDS: &[FieldRule] = &[
    FieldRule::new(Field::Title, Css(r#"h1[data-pl="product-title"]"#), Shape::Text),
    FieldRule::new(
        Field::Image,
        Css("div.image-view--previewBox--FyWaIlU img.magnifier--image--L4hZ4dC"),
        Shape::Text,
    )
    .attribute("src"),
    FieldRule::new(
        Field::Price,
        Css("div.price--current--H7sGzqb.product-price-current"),
        Shape::Price,
    ),
    FieldRule::new(
        Field::Currency,
        XPath(r#"//span[@class="es--char--Vcv75ku"]"#),
        Shape::RawText,
    ),
    FieldRule::new(
        Field::Description,
        Css("div#product-description div.description--origin-part--SsZJoGC div.detailmodule_html div.detail-desc-decorate-richtext div"),
        Shape::Joined,
    ),
    FieldRule::new(
        Field::ShippingPrice,
        Css(
            r#"div[data-pl="product-shipping"] div.dynamic-shipping div.dynamic-shipping-line.dynamic-shipping-titleLayout span strong"#,
        ),
        Shape::Price,
    ),
    FieldRule::new(
        Field::DescriptionImages,
        XPath(r#"//div[@id="product-description"]//img/@src"#),
        Shape::List,
    ),
];

pub(super) fn profile() -> PlatformProfile {
    PlatformProfile {
        platform: Platform::Aliexpress,
        session: base_session(),
        fields: FIELDS,
    }
}
