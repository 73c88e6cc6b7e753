use abaca_engine::catalog;
use abaca_runtime::{Notice, ViewController};
use abaca_types::{Aggregates, ColumnSpec, EntityKind, Record};
use serde::Serialize;

/// Column whose values are drawn as bars scaled against a `max` aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct BarScale {
    pub field: String,
    pub max: f64,
}

/// One rendered page of an entity list. Serialized as-is for `--format json`.
#[derive(Debug, Serialize)]
pub struct ListViewModel {
    pub entity: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub total_count: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub aggregates: Aggregates,
    pub items: Vec<Record>,
    #[serde(skip)]
    pub columns: Vec<ColumnSpec>,
    #[serde(skip)]
    pub bar: Option<BarScale>,
}

impl ListViewModel {
    pub fn from_controller(controller: &ViewController) -> Self {
        let config = controller.config();
        let result = controller.result();

        let bar = catalog::bar_scale(config).map(|(aggregate, field)| BarScale {
            field: field.to_string(),
            max: result.aggregates.get(aggregate).unwrap_or(1.0),
        });

        Self {
            entity: controller.entity(),
            notice: controller.notice(),
            total_count: result.total_count,
            page: result.page,
            page_count: result.page_count,
            page_size: result.page_size,
            aggregates: result.aggregates.clone(),
            items: result.items.clone(),
            columns: config.export_columns(),
            bar,
        }
    }
}
