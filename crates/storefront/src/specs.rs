//! Product specification tables.
//!
//! Rows are derived from the product on every call; there is no shared
//! label mapping to mutate between renders.

use askama::Template;

use crate::models::{NotebookSpecs, ProductSpecs, SmartphoneSpecs};

/// Label of the SD capacity row, present only for phones with an SD slot.
pub const SD_CAPACITY_LABEL: &str = "Max SD card capacity";

/// One labelled row of a specification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub label: &'static str,
    pub value: String,
}

impl SpecRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// The ordered specification rows for a product.
#[must_use]
pub fn spec_rows(specs: &ProductSpecs) -> Vec<SpecRow> {
    match specs {
        ProductSpecs::Notebook(specs) => notebook_rows(specs),
        ProductSpecs::Smartphone(specs) => smartphone_rows(specs),
    }
}

fn notebook_rows(specs: &NotebookSpecs) -> Vec<SpecRow> {
    vec![
        SpecRow::new("Diagonal", &specs.diagonal),
        SpecRow::new("Display type", &specs.display_type),
        SpecRow::new("Processor frequency", &specs.processor_freq),
        SpecRow::new("RAM", &specs.ram),
        SpecRow::new("Video card", &specs.video),
        SpecRow::new("Battery life", &specs.time_without_charge),
    ]
}

fn smartphone_rows(specs: &SmartphoneSpecs) -> Vec<SpecRow> {
    let mut rows = vec![
        SpecRow::new("Diagonal", &specs.diagonal),
        SpecRow::new("Display type", &specs.display_type),
        SpecRow::new("Screen resolution", &specs.resolution),
        SpecRow::new("Battery capacity", &specs.accum_volume),
        SpecRow::new("RAM", &specs.ram),
        SpecRow::new("SD card slot", if specs.sd { "Yes" } else { "No" }),
    ];
    if specs.sd {
        rows.push(SpecRow::new(
            SD_CAPACITY_LABEL,
            specs.sd_volume_max.as_deref().unwrap_or("Not specified"),
        ));
    }
    rows.push(SpecRow::new("Main camera", &specs.main_cam_mp));
    rows.push(SpecRow::new("Front camera", &specs.frontal_cam_mp));
    rows
}

/// HTML table fragment listing a product's specifications.
#[derive(Template)]
#[template(path = "partials/spec_table.html")]
pub struct SpecTableTemplate {
    pub rows: Vec<SpecRow>,
}

/// Render the specification table for a product. Values are HTML-escaped.
///
/// # Errors
///
/// Returns `askama::Error` if rendering fails.
pub fn render_spec_table(specs: &ProductSpecs) -> askama::Result<String> {
    SpecTableTemplate {
        rows: spec_rows(specs),
    }
    .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::catalog::fixtures::{notebook_specs, smartphone_specs};

    fn labels(rows: &[SpecRow]) -> Vec<&'static str> {
        rows.iter().map(|row| row.label).collect()
    }

    #[test]
    fn test_notebook_rows_in_order() {
        let rows = spec_rows(&ProductSpecs::Notebook(notebook_specs()));
        assert_eq!(
            labels(&rows),
            [
                "Diagonal",
                "Display type",
                "Processor frequency",
                "RAM",
                "Video card",
                "Battery life"
            ]
        );
        assert_eq!(rows[4].value, "GeForce RTX 4060");
    }

    #[test]
    fn test_smartphone_with_sd_has_capacity_row() {
        let rows = spec_rows(&ProductSpecs::Smartphone(smartphone_specs(true)));
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[5], SpecRow::new("SD card slot", "Yes"));
        assert_eq!(rows[6], SpecRow::new(SD_CAPACITY_LABEL, "512 GB"));
    }

    #[test]
    fn test_smartphone_without_sd_has_no_capacity_row() {
        let rows = spec_rows(&ProductSpecs::Smartphone(smartphone_specs(false)));
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[5], SpecRow::new("SD card slot", "No"));
        assert!(!labels(&rows).contains(&SD_CAPACITY_LABEL));
    }

    #[test]
    fn test_render_without_sd_does_not_affect_later_render() {
        let without_sd = render_spec_table(&ProductSpecs::Smartphone(smartphone_specs(false)))
            .unwrap();
        assert!(!without_sd.contains(SD_CAPACITY_LABEL));

        let with_sd =
            render_spec_table(&ProductSpecs::Smartphone(smartphone_specs(true))).unwrap();
        assert!(with_sd.contains(SD_CAPACITY_LABEL));
        assert!(with_sd.contains("512 GB"));
    }

    #[test]
    fn test_render_escapes_values() {
        let mut specs = notebook_specs();
        specs.video = "<script>alert(1)</script>".to_owned();

        let html = render_spec_table(&ProductSpecs::Notebook(specs)).unwrap();
        assert!(html.contains("<table"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("alert(1)"));
    }

    #[test]
    fn test_sd_slot_without_capacity() {
        let mut specs = smartphone_specs(true);
        specs.sd_volume_max = None;

        let rows = spec_rows(&ProductSpecs::Smartphone(specs));
        assert_eq!(rows[6], SpecRow::new(SD_CAPACITY_LABEL, "Not specified"));
    }
}
