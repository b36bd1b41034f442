//! Prompt construction and style analysis over the selected items.
//!
//! Both are pure functions: the prompt always renders, falling back to
//! placeholder text for missing fields, while the analysis silently drops
//! items that lack the aggregated field.

use std::collections::BTreeSet;

use crate::dto::StyleAnalysis;
use crate::models::FashionItem;

const PLACEHOLDER: &str = "N/A";

/// Distinct values of one field across all items, missing fields replaced
/// by the placeholder. Set semantics; rendered order is not significant.
fn distinct_or_placeholder<'a, F>(items: &'a [FashionItem], field: F) -> Vec<&'a str>
where
    F: Fn(&'a FashionItem) -> Option<&'a str>,
{
    items
        .iter()
        .map(|item| field(item).unwrap_or(PLACEHOLDER))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct values of one field across all items, missing fields dropped.
fn distinct_present<'a, F>(items: &'a [FashionItem], field: F) -> Vec<String>
where
    F: Fn(&'a FashionItem) -> Option<&'a str>,
{
    items
        .iter()
        .filter_map(|item| field(item))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Render the full generation prompt for the selected outfit.
pub fn create_style_prompt(items: &[FashionItem]) -> String {
    let outfit_components = items
        .iter()
        .map(|item| {
            format!(
                "- {}: {}",
                item.name.as_deref().unwrap_or("Unknown Item"),
                item.description.as_deref().unwrap_or("No description.")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let categories = distinct_or_placeholder(items, |i| i.category.as_deref()).join(", ");
    let colors = distinct_or_placeholder(items, |i| i.color.as_deref()).join(", ");
    let themes = distinct_or_placeholder(items, |i| i.theme.as_deref()).join(", ");

    format!(
        "Create a high-quality, professional fashion photograph of a complete styled outfit and showcase it on a woman model.\n\
         \n\
         OUTFIT COMPONENTS:\n\
         {outfit_components}\n\
         \n\
         STYLE SPECIFICATIONS:\n\
         - Categories: {categories}\n\
         - Color Palette: {colors}\n\
         - Style Themes: {themes}\n\
         \n\
         VISUAL REQUIREMENTS:\n\
         - Fashion outfit should be shown on a woman model\n\
         - Professional fashion photography studio setting\n\
         - Clean, well-lit environment with neutral white/gray background\n\
         - Model wearing the complete coordinated outfit\n\
         - All specified items clearly visible and well-styled\n\
         - High-resolution, sharp focus, editorial quality\n\
         - Elegant model pose, sophisticated composition\n\
         - Modern fashion magazine aesthetic\n\
         - Portrait orientation (3:4 aspect ratio)\n\
         \n\
         Generate a stunning, cohesive fashionable image of a woman whose outfit combines all these elements into one perfectly styled look."
    )
}

/// Aggregate the summary echoed back in the response.
pub fn analyze_items(items: &[FashionItem]) -> StyleAnalysis {
    StyleAnalysis {
        total_items: items.len(),
        categories: distinct_present(items, |i| i.category.as_deref()),
        dominant_colors: distinct_present(items, |i| i.color.as_deref()),
        style_themes: distinct_present(items, |i| i.theme.as_deref()),
        items_used: items
            .iter()
            .filter_map(|item| item.name.clone())
            .collect(),
    }
}
