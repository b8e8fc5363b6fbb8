//! Static description of the traced [`DrawEngine`](crate::DrawEngine) operations.
//!
//! The analyzer labels captured arguments with these parameter names, and
//! tooling can enumerate the operations and their parameter kinds.

use serde::Serialize;
use serde_json::{Map, Value};

/// Semantic type of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    /// A [`Vector2D`](drawkit_core::Vector2D).
    Vector2d,
    /// A list of 2D vectors.
    Vector2dList,
    /// A [`Vector3D`](drawkit_core::Vector3D).
    Vector3d,
    /// Euler angle sets in degrees.
    Angles,
    /// A [`Rect`](drawkit_core::Rect).
    Rectangle,
    /// A list of rectangles.
    RectangleList,
    /// A plain number.
    Number,
    /// A style pass or CSS color.
    Color,
    /// A list of CSS colors.
    ColorList,
    /// Per-face fill styles.
    FaceColors,
    /// A string such as a filter, font or name.
    Text,
    /// A flag.
    Boolean,
    /// A position unit.
    Unit,
    /// A fill rule.
    FillRule,
    /// Text placement.
    TextBox,
    /// A built geometry.
    Geometry,
    /// A surface image.
    Image,
    /// A rendering surface.
    Surface,
}

/// One parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamMeta {
    /// Parameter name.
    pub name: &'static str,
    /// Semantic type.
    pub kind: ParamKind,
    /// Whether the parameter may be omitted.
    pub optional: bool,
}

/// One traced operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodMeta {
    /// Operation name.
    pub name: &'static str,
    /// Parameters in call order.
    pub params: &'static [ParamMeta],
}

const fn p(name: &'static str, kind: ParamKind) -> ParamMeta {
    ParamMeta {
        name,
        kind,
        optional: false,
    }
}

const fn opt(name: &'static str, kind: ParamKind) -> ParamMeta {
    ParamMeta {
        name,
        kind,
        optional: true,
    }
}

const fn m(name: &'static str, params: &'static [ParamMeta]) -> MethodMeta {
    MethodMeta { name, params }
}

use ParamKind::{
    Angles, Boolean, Color, ColorList, FaceColors, Geometry, Image, Number, Rectangle,
    RectangleList, Surface, Text, Unit, Vector2d, Vector2dList, Vector3d,
};

/// Every traced operation, sorted by name.
pub const DRAW_ENGINE_META: &[MethodMeta] = &[
    m("begin_path", &[]),
    m(
        "circle",
        &[
            p("position", Vector2d),
            p("radius", Number),
            p("stroke_style", Color),
            p("fill_style", Color),
        ],
    ),
    m("clip_rect", &[p("rects", RectangleList)]),
    m("clip_round_rect", &[p("rects", RectangleList), p("radius", Number)]),
    m("close_path", &[]),
    m("cls", &[]),
    m(
        "cube",
        &[
            p("plane_rect", Rectangle),
            opt("depth", Number),
            p("tilt", Number),
            p("stroke_style", Color),
            p("fill_styles", FaceColors),
        ],
    ),
    m(
        "cube3d",
        &[
            p("plane_rect", Rectangle),
            opt("depth", Number),
            p("angles", Angles),
            p("stroke_style", Color),
            p("fill_styles", FaceColors),
            p("pivot", Vector3d),
        ],
    ),
    m(
        "donut",
        &[
            p("position", Vector2d),
            p("outer_radius", Number),
            p("inner_radius", Number),
            p("stroke_style", Color),
            p("fill_style", Color),
        ],
    ),
    m("fill", &[p("fill_rule", ParamKind::FillRule)]),
    m("geometry", &[p("store", Geometry)]),
    m(
        "gradient_lines",
        &[
            p("start", Vector2d),
            p("destinations", Vector2dList),
            p("colors", ColorList),
            p("width", Number),
        ],
    ),
    m(
        "grid",
        &[
            p("cell_size", Number),
            p("stroke_style", Color),
            opt("area", Rectangle),
            p("angle", Number),
        ],
    ),
    m(
        "hexagon",
        &[
            p("position", Vector2d),
            p("radius", Number),
            p("stroke_style", Color),
            p("fill_style", Color),
            p("angle", Number),
        ],
    ),
    m(
        "image",
        &[
            p("image", Image),
            p("src", Rectangle),
            opt("dst", Rectangle),
            p("angle", Number),
            p("pivot", Vector2d),
        ],
    ),
    m(
        "lines",
        &[
            p("start", Vector2d),
            p("destinations", Vector2dList),
            p("stroke_style", Color),
            p("fill_style", Color),
            p("line_width", Number),
        ],
    ),
    m("move_to", &[p("position", Vector2d)]),
    m(
        "ngon",
        &[
            p("position", Vector2d),
            p("radius", Number),
            p("sides", Number),
            p("stroke_style", Color),
            p("fill_style", Color),
            p("angle", Number),
        ],
    ),
    m(
        "quadratic_curve_to",
        &[p("control_point", Vector2d), p("position", Vector2d)],
    ),
    m(
        "rectangle",
        &[
            p("rect", Rectangle),
            p("stroke_style", Color),
            p("fill_style", Color),
            p("angle", Number),
            p("pivot", Vector2d),
        ],
    ),
    m("remove_draw_condition", &[]),
    m("reset_clip", &[]),
    m("restore", &[]),
    m(
        "round_rectangle",
        &[
            p("rect", Rectangle),
            p("radius", Number),
            p("stroke_style", Color),
            p("fill_style", Color),
        ],
    ),
    m("save", &[]),
    m("select_rect", &[p("rect", Rectangle)]),
    m("select_round_rect", &[p("rect", Rectangle), p("radius", Number)]),
    m(
        "set_conditional_filter",
        &[p("condition", Boolean), p("filter", Text)],
    ),
    m("set_context", &[p("surface", Surface)]),
    m("set_draw_condition", &[p("condition", Boolean)]),
    m("set_fill_style", &[p("color", Color)]),
    m("set_filter", &[p("filter", Text)]),
    m("set_font", &[p("font", Text)]),
    m("set_global_composite_operation", &[p("operation", Text)]),
    m("set_stroke_style", &[p("color", Color)]),
    m("set_unit", &[p("unit", Unit)]),
    m("start", &[opt("name", Text)]),
    m("stroke", &[]),
    m(
        "text",
        &[
            p("text_box", ParamKind::TextBox),
            p("text", Text),
            opt("color", Color),
            opt("font", Text),
        ],
    ),
];

/// Find the description of `method`.
#[must_use]
pub fn lookup(method: &str) -> Option<&'static MethodMeta> {
    DRAW_ENGINE_META
        .binary_search_by(|meta| meta.name.cmp(method))
        .ok()
        .and_then(|index| DRAW_ENGINE_META.get(index))
}

/// Names of every traced operation.
#[must_use]
pub fn method_names() -> impl Iterator<Item = &'static str> {
    DRAW_ENGINE_META.iter().map(|meta| meta.name)
}

/// Key positional arguments by parameter name.
///
/// Unknown methods keep the arguments as an array. Arguments beyond the
/// described parameters are keyed by their position.
#[must_use]
pub fn label_arguments(method: &str, arguments: Vec<Value>) -> Value {
    let Some(meta) = lookup(method) else {
        return Value::Array(arguments);
    };
    let mut labelled = Map::with_capacity(arguments.len());
    for (index, value) in arguments.into_iter().enumerate() {
        let key = meta
            .params
            .get(index)
            .map_or_else(|| index.to_string(), |param| param.name.to_string());
        labelled.insert(key, value);
    }
    Value::Object(labelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_is_sorted_and_unique() {
        let names: Vec<&str> = method_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_lookup() {
        let circle = lookup("circle").expect("circle is traced");
        assert_eq!(circle.params.len(), 4);
        assert_eq!(circle.params[0].kind, ParamKind::Vector2d);
        assert!(lookup("context").is_none());
    }

    #[test]
    fn test_optional_params() {
        let text = lookup("text").expect("text is traced");
        let optional: Vec<&str> = text
            .params
            .iter()
            .filter(|param| param.optional)
            .map(|param| param.name)
            .collect();
        assert_eq!(optional, vec!["color", "font"]);
    }

    #[test]
    fn test_label_arguments() {
        let labelled = label_arguments("set_fill_style", vec![json!("red"), json!(1)]);
        assert_eq!(labelled, json!({"color": "red", "1": 1}));
    }

    #[test]
    fn test_label_arguments_unknown_method() {
        let labelled = label_arguments("unknown", vec![json!(1)]);
        assert_eq!(labelled, json!([1]));
    }
}
