use crate::{
    infra::ic::http::{HttpRequestResult, TransformArgs},
    ops::ic::http::HttpOps,
};

/// Body of the exported `transform` query used by certificate outcalls.
#[must_use]
pub fn transform(args: TransformArgs) -> HttpRequestResult {
    HttpOps::transform(args)
}
