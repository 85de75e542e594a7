//! Per-kind list handlers.

use clap::ValueEnum;
use resquery::{
    default_filter, no_transform, CompareFunc, DefaultListHandler, Field, FilterFunc, ListHandler,
    Object, TransformFunc,
};

use crate::resource::Resource;

pub type Item = Option<Resource>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Kind {
    /// Metadata ordering and filters
    #[default]
    Generic,
    /// Newest run first by start time, filterable by `status`
    Pipelinerun,
}

impl Kind {
    pub fn handler(self) -> Box<dyn ListHandler<Item>> {
        match self {
            Kind::Generic => Box::new(DefaultListHandler),
            Kind::Pipelinerun => Box::new(PipelineRunHandler),
        }
    }
}

/// Orders runs by start time, falling back to creation time for runs that
/// have not started. Equal times order by name, ascending. The sort field is
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineRunHandler;

impl ListHandler<Item> for PipelineRunHandler {
    fn comparator(&self) -> CompareFunc<Item> {
        CompareFunc::new(|left: &Item, right: &Item, _field| {
            let (Some(left), Some(right)) = (left, right) else {
                return false;
            };
            let (l, r) = (run_time(left), run_time(right));
            if l == r {
                left.metadata.name < right.metadata.name
            } else {
                l > r
            }
        })
    }

    fn filter(&self) -> FilterFunc<Item> {
        // ?status=Running
        let phase = FilterFunc::new(|item: &Item, filter| match (filter.field, item) {
            (Field::Status, Some(run)) => run.phase() == filter.value,
            _ => true,
        });
        default_filter().and(phase)
    }

    fn transformer(&self) -> TransformFunc<Item> {
        no_transform()
    }
}

fn run_time(run: &Resource) -> Option<chrono::DateTime<chrono::Utc>> {
    run.start_time().or(run.object_meta()?.creation_timestamp)
}

/// Projects each item to its name.
pub fn names_only() -> TransformFunc<Item> {
    TransformFunc::project(|item: &Item| {
        serde_json::Value::String(
            item.object_meta()
                .map(|meta| meta.name.clone())
                .unwrap_or_default(),
        )
    })
}
