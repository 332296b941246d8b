use std::fmt::Write as _;

use crate::{
    foundation::core::{Point, Vec2, centered_square},
    scene::model::{ItemHandle, Scene, TitleRole},
};

const GREYSCALE_MATRIX: &str = "0 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1 0 1 0";
const FALLBACK_STROKE: &str = "#999999";

/// Serialize the scene as a standalone SVG document.
///
/// Fully transparent handles are skipped. Item images are referenced by href; a disc the size of
/// the image is drawn underneath so a scene without reachable images still rasterizes to something
/// recognizable.
pub fn render_svg(scene: &Scene) -> String {
    let size = scene.viewport.outer_size();
    let m = scene.viewport.margin;
    let mut out = String::with_capacity(4096 + scene.items.len() * 256);

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = fmt_num(size.width),
        h = fmt_num(size.height),
    );
    let _ = write!(
        out,
        "<defs><filter id=\"greyscale\"><feColorMatrix type=\"matrix\" values=\"{GREYSCALE_MATRIX}\"/></filter></defs>"
    );
    let _ = write!(out, "<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");
    let _ = write!(out, "<g transform=\"{}\">", translate(Vec2::new(m.left, m.top)));

    write_titles(&mut out, scene);
    write_legend(&mut out, scene);
    write_edges(&mut out, scene);
    if scene.nodes_above_tree_links {
        write_tree_links(&mut out, scene);
        write_items(&mut out, scene);
    } else {
        write_items(&mut out, scene);
        write_tree_links(&mut out, scene);
    }
    write_tooltip(&mut out, scene);

    out.push_str("</g></svg>");
    out
}

fn write_titles(out: &mut String, scene: &Scene) {
    for t in scene.titles.iter().filter(|t| t.opacity > 0.0) {
        let font_size = match t.role {
            TitleRole::Title => 40,
            TitleRole::Subtitle => 20,
        };
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" opacity=\"{}\" font-family=\"sans-serif\" font-size=\"{font_size}\" text-anchor=\"middle\">",
            fmt_num(t.position.x),
            fmt_num(t.position.y),
            fmt_num(t.opacity),
        );
        svg_escape_into(out, &t.text);
        out.push_str("</text>");
    }
}

fn write_legend(out: &mut String, scene: &Scene) {
    let legend = &scene.legend;
    if legend.opacity <= 0.0 {
        return;
    }
    let _ = write!(
        out,
        "<g class=\"category-legend\" transform=\"{}\" opacity=\"{}\">",
        translate(legend.origin.to_vec2()),
        fmt_num(legend.opacity),
    );
    for (i, e) in legend.entries.iter().enumerate() {
        let y = i as f64 * 17.0;
        let weight = if e.emphasized { "bold" } else { "normal" };
        let _ = write!(
            out,
            "<circle cx=\"0\" cy=\"{y}\" r=\"4\" fill=\"{color}\"/>\
             <text x=\"10\" y=\"{ty}\" font-family=\"sans-serif\" font-size=\"12\" font-weight=\"{weight}\">",
            y = fmt_num(y),
            ty = fmt_num(y + 4.0),
            color = e.color.to_hex(),
        );
        svg_escape_into(out, &e.category);
        out.push_str("</text>");
    }
    out.push_str("</g>");
}

fn write_edges(out: &mut String, scene: &Scene) {
    out.push_str("<g class=\"links\">");
    for e in scene.edges.iter().filter(|e| e.opacity > 0.0) {
        let _ = write!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\" opacity=\"{}\"/>",
            fmt_num(e.from.x),
            fmt_num(e.from.y),
            fmt_num(e.to.x),
            fmt_num(e.to.y),
            e.color.to_hex(),
            fmt_num(e.opacity),
        );
    }
    out.push_str("</g>");
}

fn write_tree_links(out: &mut String, scene: &Scene) {
    let _ = write!(
        out,
        "<g class=\"tree-links\" transform=\"{}\" fill=\"none\">",
        translate(scene.tree_link_offset)
    );
    for l in scene.tree_links.iter().filter(|l| l.opacity > 0.0) {
        let stroke = l.color.map_or_else(|| FALLBACK_STROKE.to_string(), |c| c.to_hex());
        let _ = write!(
            out,
            "<path d=\"{}\" stroke=\"{stroke}\" opacity=\"{}\"/>",
            vertical_link(l.from, l.to),
            fmt_num(l.opacity),
        );
    }
    out.push_str("</g>");
}

fn write_items(out: &mut String, scene: &Scene) {
    let _ = write!(
        out,
        "<g class=\"nodes\" transform=\"{}\">",
        translate(scene.node_offset)
    );
    for &slot in &scene.draw_order {
        let Some(item) = scene.items.get(slot) else {
            continue;
        };
        if item.opacity > 0.0 {
            write_item(out, item);
        }
    }
    out.push_str("</g>");
}

fn write_item(out: &mut String, item: &ItemHandle) {
    let extent = centered_square(item.image_size);
    let filter = if item.is_dimmed() {
        " filter=\"url(#greyscale)\""
    } else {
        ""
    };
    let _ = write!(
        out,
        "<g class=\"node\" transform=\"{}\" opacity=\"{}\">",
        translate(item.position.to_vec2()),
        fmt_num(item.opacity),
    );
    let _ = write!(
        out,
        "<circle r=\"{}\" fill=\"#4682b4\"{filter}/>",
        fmt_num(extent.width() / 2.0)
    );
    let _ = write!(
        out,
        "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{filter} xlink:href=\"",
        fmt_num(extent.x0),
        fmt_num(extent.y0),
        fmt_num(extent.width()),
        fmt_num(extent.height()),
    );
    svg_escape_into(out, &item.image);
    out.push_str("\"/>");
    if let Some(label) = &item.label {
        let weight = if label.emphasized { "bold" } else { "normal" };
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\" font-weight=\"{weight}\">",
            fmt_num(label.offset.x),
            fmt_num(label.offset.y),
        );
        svg_escape_into(out, &label.text);
        out.push_str("</text>");
    }
    out.push_str("</g>");
}

fn write_tooltip(out: &mut String, scene: &Scene) {
    let tip = &scene.tooltip;
    if tip.opacity <= 0.0 || tip.text.is_empty() {
        return;
    }
    let width = 8.0 * tip.text.chars().count() as f64 + 12.0;
    let _ = write!(
        out,
        "<g class=\"tooltip\" transform=\"{}\" opacity=\"{}\">\
         <rect width=\"{}\" height=\"24\" rx=\"4\" fill=\"#000000\"/>\
         <text x=\"6\" y=\"16\" font-family=\"sans-serif\" font-size=\"13\" fill=\"#ffffff\">",
        translate(tip.anchor.to_vec2()),
        fmt_num(tip.opacity),
        fmt_num(width),
    );
    svg_escape_into(out, &tip.text);
    out.push_str("</text></g>");
}

/// Cubic path leaving and entering each end vertically.
fn vertical_link(from: Point, to: Point) -> String {
    let mid = (from.y + to.y) / 2.0;
    format!(
        "M{},{}C{},{},{},{},{},{}",
        fmt_num(from.x),
        fmt_num(from.y),
        fmt_num(from.x),
        fmt_num(mid),
        fmt_num(to.x),
        fmt_num(mid),
        fmt_num(to.x),
        fmt_num(to.y),
    )
}

fn translate(v: Vec2) -> String {
    format!("translate({},{})", fmt_num(v.x), fmt_num(v.y))
}

// Up to three decimals, trailing zeros trimmed.
fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/export.rs"]
mod tests;
