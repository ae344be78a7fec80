use crate::error::{ConvertError, Result};
use crate::geometry::transform::Transform;
use crate::model::{Label, Path};
use crate::svg::parse_path_data;
use log::debug;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// A `<path>` element, `d` kept as raw path data until a command asks for it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathElement {
    pub id: Option<String>,
    pub d: Option<String>,
}

/// A `<text>` element. `tspan` is the text of the first nested `<tspan>`,
/// `None` when there is no such child.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextElement {
    pub x: Option<String>,
    pub y: Option<String>,
    pub tspan: Option<String>,
}

/// A top-level `<g>` with its direct path and text children in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    pub label: Option<String>,
    pub paths: Vec<PathElement>,
    pub texts: Vec<TextElement>,
}

/// Read-only lookups the compiler needs from a vector-graphics document.
pub trait SvgQuery {
    /// Top-level groups whose `inkscape:label` equals `label`.
    fn layers_labeled(&self, label: &str) -> Vec<&Layer>;
    /// Path elements at any depth whose `id` equals `id`.
    fn paths_with_id(&self, id: &str) -> Vec<&PathElement>;
}

/// Owned snapshot of the parts of an SVG document the queries read.
#[derive(Clone, Debug, Default)]
pub struct SvgDocument {
    layers: Vec<Layer>,
    paths: Vec<PathElement>,
}

/// Parses SVG text. Exporters commonly write a `<!DOCTYPE svg ...>`
/// declaration, so DTDs are allowed.
fn parse_xml(xml: &str) -> Result<roxmltree::Document<'_>> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(roxmltree::Document::parse_with_options(xml, opts)?)
}

fn path_element(node: roxmltree::Node<'_, '_>) -> PathElement {
    PathElement {
        id: node.attribute("id").map(str::to_string),
        d: node.attribute("d").map(str::to_string),
    }
}

fn text_element(node: roxmltree::Node<'_, '_>) -> TextElement {
    let tspan = node
        .children()
        .find(|c| c.has_tag_name((SVG_NS, "tspan")))
        .map(|t| t.text().unwrap_or("").to_string());
    TextElement {
        x: node.attribute("x").map(str::to_string),
        y: node.attribute("y").map(str::to_string),
        tspan,
    }
}

impl SvgDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = parse_xml(xml)?;
        let root = doc.root_element();

        let mut layers = Vec::new();
        for g in root.children().filter(|n| n.has_tag_name((SVG_NS, "g"))) {
            let mut layer = Layer {
                label: g.attribute((INKSCAPE_NS, "label")).map(str::to_string),
                ..Layer::default()
            };
            for child in g.children().filter(|n| n.is_element()) {
                if child.has_tag_name((SVG_NS, "path")) {
                    layer.paths.push(path_element(child));
                } else if child.has_tag_name((SVG_NS, "text")) {
                    layer.texts.push(text_element(child));
                }
            }
            layers.push(layer);
        }

        let paths = doc
            .descendants()
            .filter(|n| n.has_tag_name((SVG_NS, "path")))
            .map(path_element)
            .collect::<Vec<_>>();

        debug!("document has {} top-level groups, {} paths", layers.len(), paths.len());
        Ok(SvgDocument { layers, paths })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

impl SvgQuery for SvgDocument {
    fn layers_labeled(&self, label: &str) -> Vec<&Layer> {
        self.layers
            .iter()
            .filter(|l| l.label.as_deref() == Some(label))
            .collect()
    }

    fn paths_with_id(&self, id: &str) -> Vec<&PathElement> {
        self.paths
            .iter()
            .filter(|p| p.id.as_deref() == Some(id))
            .collect()
    }
}

/// Identifiers of every `<path>` carrying an `id`, in document order.
/// These are the paths handed to the flattener.
pub fn path_ids(xml: &str) -> Result<Vec<String>> {
    let doc = parse_xml(xml)?;
    Ok(doc
        .descendants()
        .filter(|n| n.has_tag_name((SVG_NS, "path")))
        .filter_map(|n| n.attribute("id").map(str::to_string))
        .collect())
}

fn exactly_one<T>(mut found: Vec<T>, kind: &'static str, key: &str) -> Result<T> {
    if found.len() != 1 {
        return Err(ConvertError::Lookup {
            kind,
            key: key.to_string(),
            found: found.len(),
        });
    }
    Ok(found.remove(0))
}

fn parse_element(el: &PathElement, owner: &str, transform: &Transform) -> Result<Path> {
    let what = match &el.id {
        Some(id) => format!("path '{}'", id),
        None => format!("unnamed path in {}", owner),
    };
    let d = el
        .d
        .as_deref()
        .ok_or_else(|| ConvertError::parse(what.clone(), "missing 'd' attribute"))?;
    parse_path_data(d, transform).map_err(|e| match e {
        ConvertError::Parse { reason, .. } => ConvertError::Parse { what, reason },
        other => other,
    })
}

/// The single top-level group labelled `label`.
pub fn layer_by_label<'d, Q: SvgQuery + ?Sized>(doc: &'d Q, label: &str) -> Result<&'d Layer> {
    exactly_one(doc.layers_labeled(label), "layer", label)
}

/// The single path with identifier `id`, parsed into simulation space.
pub fn path_by_id<Q: SvgQuery + ?Sized>(doc: &Q, id: &str, transform: &Transform) -> Result<Path> {
    let el = exactly_one(doc.paths_with_id(id), "path", id)?;
    parse_element(el, "document", transform)
}

/// Every direct path child of the layer, in document order.
pub fn paths_in_layer<Q: SvgQuery + ?Sized>(
    doc: &Q,
    label: &str,
    transform: &Transform,
) -> Result<Vec<Path>> {
    let layer = layer_by_label(doc, label)?;
    let owner = format!("layer '{}'", label);
    layer
        .paths
        .iter()
        .map(|el| parse_element(el, &owner, transform))
        .collect()
}

/// Every direct text child of the layer as a positioned label.
pub fn labels_in_layer<Q: SvgQuery + ?Sized>(
    doc: &Q,
    label: &str,
    transform: &Transform,
) -> Result<Vec<Label>> {
    let layer = layer_by_label(doc, label)?;
    let what = || format!("text in layer '{}'", label);
    let coord = |raw: &Option<String>, axis: &str| -> Result<f64> {
        let raw = raw
            .as_deref()
            .ok_or_else(|| ConvertError::parse(what(), format!("missing '{}' attribute", axis)))?;
        raw.trim().parse::<f64>().map_err(|_| {
            ConvertError::parse(what(), format!("'{}' attribute '{}' is not a number", axis, raw))
        })
    };

    let mut labels = Vec::with_capacity(layer.texts.len());
    for t in &layer.texts {
        let x = coord(&t.x, "x")?;
        let y = coord(&t.y, "y")?;
        let text = t
            .tspan
            .clone()
            .ok_or_else(|| ConvertError::parse(what(), "no <tspan> child"))?;
        labels.push(Label {
            at: transform.apply(x, y),
            text,
        });
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::Vertex;

    const DOC: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
        xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
      <g inkscape:label="arena">
        <path id="outer" d="M 0 0 L 10 0 L 10 10 Z"/>
        <path id="inner" d="M 2 2 L 4 2 L 4 4 Z"/>
        <text x="5" y="6"><tspan>Goal</tspan></text>
        <g><path id="nested" d="M 1 1 L 2 2"/></g>
      </g>
      <g inkscape:label="twice"/>
      <g inkscape:label="twice"/>
      <g inkscape:label="labels">
        <text x="1" y="2"><tspan>A</tspan><tspan>ignored</tspan></text>
        <text x="3" y="4"><tspan/></text>
      </g>
      <path id="dup" d="M 0 0 L 1 0"/>
      <path id="dup" d="M 0 0 L 2 0"/>
    </svg>"#;

    fn doc() -> SvgDocument {
        SvgDocument::parse(DOC).unwrap()
    }

    #[test]
    fn counts() {
        let d = doc();
        assert_eq!(d.layer_count(), 4);
        assert_eq!(d.path_count(), 5);
    }

    #[test]
    fn layer_paths_are_direct_children_in_order() {
        let paths = paths_in_layer(&doc(), "arena", &Transform::identity()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0][2], Vertex::new(10.0, -10.0));
        assert_eq!(paths[1][0], Vertex::new(2.0, -2.0));
    }

    #[test]
    fn path_found_at_any_depth() {
        let p = path_by_id(&doc(), "nested", &Transform::new(2.0)).unwrap();
        assert_eq!(p, vec![Vertex::new(2.0, -2.0), Vertex::new(4.0, -4.0)]);
    }

    #[test]
    fn lookups_need_exactly_one_match() {
        let d = doc();
        let err = layer_by_label(&d, "missing").unwrap_err();
        assert!(matches!(err, ConvertError::Lookup { found: 0, .. }));
        let err = layer_by_label(&d, "twice").unwrap_err();
        assert!(matches!(err, ConvertError::Lookup { found: 2, .. }));
        let err = path_by_id(&d, "dup", &Transform::identity()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.to_string().contains("'dup'"));
    }

    #[test]
    fn labels_use_first_tspan() {
        let labels = labels_in_layer(&doc(), "labels", &Transform::new(10.0)).unwrap();
        assert_eq!(
            labels,
            vec![
                Label { at: Vertex::new(10.0, -20.0), text: "A".to_string() },
                Label { at: Vertex::new(30.0, -40.0), text: String::new() },
            ]
        );
    }

    #[test]
    fn text_without_tspan_is_malformed() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"
            xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
          <g inkscape:label="l"><text x="1" y="1">bare</text></g></svg>"#;
        let d = SvgDocument::parse(xml).unwrap();
        let err = labels_in_layer(&d, "l", &Transform::identity()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn parse_errors_name_the_path() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="bad" d="M 0 0 Z L 1 1"/></svg>"#;
        let d = SvgDocument::parse(xml).unwrap();
        let err = path_by_id(&d, "bad", &Transform::identity()).unwrap_err();
        assert!(err.to_string().contains("path 'bad'"));
    }

    #[test]
    fn collects_ids_for_flattening() {
        assert_eq!(path_ids(DOC).unwrap(), vec!["outer", "inner", "nested", "dup", "dup"]);
    }

    #[test]
    fn doctype_declaration_accepted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" version="1.1"><path id="p" d="M 0 0 L 3 4"/></svg>"#;
        assert_eq!(path_ids(xml).unwrap(), vec!["p"]);
        let d = SvgDocument::parse(xml).unwrap();
        let p = path_by_id(&d, "p", &Transform::identity()).unwrap();
        assert_eq!(p, vec![Vertex::new(0.0, 0.0), Vertex::new(3.0, -4.0)]);
    }

    #[test]
    fn invalid_xml() {
        assert_eq!(SvgDocument::parse("<svg").unwrap_err().kind(), ErrorKind::Xml);
    }
}
