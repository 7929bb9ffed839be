//! Content Structure category

use super::factor_names::*;
use super::{Category, CategoryScore, Factor, Status, ratio};
use crate::extract::ExtractionResult;

pub(super) fn score(extraction: &ExtractionResult) -> CategoryScore {
    let cs = &extraction.content_structure;
    let mut factors = Vec::with_capacity(7);

    let headings = &cs.headings;
    let h2_count = headings.distribution.get(1).copied().unwrap_or(0);
    let any_heading = headings.distribution.iter().any(|&n| n > 0);
    let mut heading_points = match headings.h1_count {
        0 => 0.0,
        1 => 10.0,
        _ => 5.0,
    };
    if any_heading && headings.proper_hierarchy {
        heading_points += 5.0;
    }
    if h2_count > 0 {
        heading_points += 5.0;
    }
    let mut heading_notes = vec![match headings.h1_count {
        0 => "No <h1>".to_string(),
        1 => format!("<h1> \"{}\"", headings.h1_text.as_deref().unwrap_or_default()),
        n => format!("{n} <h1> elements"),
    }];
    heading_notes.extend(headings.hierarchy_issues.iter().cloned());
    factors.push(Factor::new(
        HEADING_STRUCTURE,
        20,
        heading_points,
        match heading_points {
            p if p >= 15.0 => Status::Pass,
            p if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        heading_notes.join("; "),
    ));

    let landmarks = &cs.landmarks;
    let found: Vec<&str> = [
        ("main", landmarks.has_main, 6.0),
        ("header", landmarks.has_header, 3.0),
        ("nav", landmarks.has_navigation, 3.0),
        ("footer", landmarks.has_footer, 3.0),
    ]
    .iter()
    .filter(|(_, present, _)| *present)
    .map(|(name, _, _)| *name)
    .collect();
    let landmark_points = [
        (landmarks.has_main, 6.0),
        (landmarks.has_header, 3.0),
        (landmarks.has_navigation, 3.0),
        (landmarks.has_footer, 3.0),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, w)| w)
    .sum::<f64>();
    factors.push(Factor::new(
        SEMANTIC_LANDMARKS,
        15,
        landmark_points,
        match (landmarks.has_main, landmark_points) {
            (true, p) if p >= 12.0 => Status::Pass,
            (_, p) if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        if found.is_empty() {
            "No landmark elements".to_string()
        } else {
            format!("Landmarks: {}", found.join(", "))
        },
    ));

    let images = &cs.images;
    factors.push(if images.total_images == 0 {
        Factor::new(IMAGE_ALT_TEXT, 15, 0.0, Status::Warning, "No images on the page")
    } else {
        let with_alt = images.total_images - images.images_missing_alt;
        let coverage = with_alt as f64 / images.total_images as f64;
        Factor::new(
            IMAGE_ALT_TEXT,
            15,
            coverage * 15.0,
            match coverage {
                c if c >= 0.9 => Status::Pass,
                c if c >= 0.5 => Status::Warning,
                _ => Status::Fail,
            },
            format!("{with_alt}/{} images have alt text", images.total_images),
        )
    });

    let a11y = &cs.accessibility;
    let input_share = ratio(a11y.labeled_inputs, a11y.total_inputs);
    let a11y_points = if a11y.lang.is_some() { 4.0 } else { 0.0 }
        + if a11y.labeled_elements > 0 || a11y.described_elements > 0 { 3.0 } else { 0.0 }
        + input_share * 3.0;
    factors.push(Factor::new(
        ACCESSIBILITY,
        10,
        a11y_points,
        if a11y_points >= 8.0 { Status::Pass } else { Status::Warning },
        format!(
            "lang {}; {} ARIA-labelled elements; {}/{} inputs labelled",
            a11y.lang.as_deref().unwrap_or("missing"),
            a11y.labeled_elements,
            a11y.labeled_inputs,
            a11y.total_inputs
        ),
    ));

    let lt = &cs.lists_tables;
    let list_points = if lt.lists > 0 { 5.0 } else { 0.0 }
        + if lt.tables > 0 || lt.definition_lists > 0 { 5.0 } else { 0.0 };
    factors.push(Factor::new(
        LISTS_TABLES,
        10,
        list_points,
        match list_points {
            p if p >= 10.0 => Status::Pass,
            p if p > 0.0 => Status::Warning,
            _ => Status::Fail,
        },
        format!(
            "{} lists, {} tables, {} definition lists",
            lt.lists, lt.tables, lt.definition_lists
        ),
    ));

    let js = &cs.js;
    factors.push(if js.js_dependent {
        Factor::new(
            JS_DEPENDENCY,
            20,
            5.0,
            Status::Warning,
            match &js.framework {
                Some(framework) => format!(
                    "{framework} root holds {} characters before rendering; crawlers without JavaScript see little content",
                    js.root_text_length
                ),
                None => format!(
                    "{} characters of body text across {} scripts",
                    js.body_text_length, js.script_count
                ),
            },
        )
    } else {
        Factor::new(JS_DEPENDENCY, 20, 20.0, Status::Pass, "Content is present in the initial HTML")
    });

    let schema_breadcrumb = extraction.structured_data.schemas.breadcrumb.is_some();
    factors.push(if cs.has_breadcrumb_nav || schema_breadcrumb {
        Factor::new(
            BREADCRUMB_NAVIGATION,
            10,
            10.0,
            Status::Pass,
            if cs.has_breadcrumb_nav { "Breadcrumb navigation" } else { "Breadcrumb from structured data" },
        )
    } else {
        Factor::new(BREADCRUMB_NAVIGATION, 10, 0.0, Status::Warning, "No breadcrumb navigation")
    });

    CategoryScore::from_factors(Category::ContentStructure, factors)
}
