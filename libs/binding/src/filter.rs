//! Persistence-neutral key filters built from prefixed identifiers.
//!
//! A filter names the column and the native key values to match; turning it
//! into a query is up to the storage layer. Identifiers carrying another
//! prefix become `None`, which matches no row.

use pidmap_core::{Codec, NativeKey, PidError};
use serde::Serialize;

use crate::cast::{CastContext, KeyCast};

/// How a filter joins the conditions before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    And,
    Or,
}

/// Comparison applied to the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq(Option<NativeKey>),
    In(Vec<Option<NativeKey>>),
}

/// A single key condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFilter {
    pub column: String,
    pub op: FilterOp,
    pub conjunction: Conjunction,
}

/// Builds key filters for records of one entity type.
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder<'a> {
    codec: Codec<'a>,
    ctx: CastContext<'a>,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(codec: Codec<'a>, ctx: CastContext<'a>) -> Self {
        Self { codec, ctx }
    }

    fn target(&self, attribute: Option<&str>) -> Result<(String, String), PidError> {
        let column = attribute.unwrap_or(self.ctx.primary_key);
        let entity_type = KeyCast::new().resolve_entity_type(&self.codec, &self.ctx, column)?;
        Ok((column.to_string(), entity_type))
    }

    fn eq(
        &self,
        id: &str,
        attribute: Option<&str>,
        conjunction: Conjunction,
    ) -> Result<KeyFilter, PidError> {
        let (column, entity_type) = self.target(attribute)?;
        let key = self.codec.parse(&entity_type, Some(id))?;
        Ok(KeyFilter {
            column,
            op: FilterOp::Eq(key),
            conjunction,
        })
    }

    fn any_of<I, S>(
        &self,
        ids: I,
        attribute: Option<&str>,
        conjunction: Conjunction,
    ) -> Result<KeyFilter, PidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (column, entity_type) = self.target(attribute)?;
        let keys = self.codec.parse_many(&entity_type, ids)?;
        Ok(KeyFilter {
            column,
            op: FilterOp::In(keys),
            conjunction,
        })
    }

    /// `attribute = key(id)`; the primary key when `attribute` is `None`.
    pub fn where_prefixed_id(&self, id: &str, attribute: Option<&str>) -> Result<KeyFilter, PidError> {
        self.eq(id, attribute, Conjunction::And)
    }

    pub fn or_where_prefixed_id(
        &self,
        id: &str,
        attribute: Option<&str>,
    ) -> Result<KeyFilter, PidError> {
        self.eq(id, attribute, Conjunction::Or)
    }

    /// `attribute IN (key(id), ...)`.
    pub fn where_prefixed_id_in<I, S>(
        &self,
        ids: I,
        attribute: Option<&str>,
    ) -> Result<KeyFilter, PidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_of(ids, attribute, Conjunction::And)
    }

    pub fn or_where_prefixed_id_in<I, S>(
        &self,
        ids: I,
        attribute: Option<&str>,
    ) -> Result<KeyFilter, PidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_of(ids, attribute, Conjunction::Or)
    }
}
