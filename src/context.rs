use ckb_spore_config::{ScriptEntry, ScriptKind, SporeConfig};
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{DEFAULT_MIN_FEE_RATE, FeeRate};
use ckb_spore_traits::{
    Cell, CellIndexer, CellProvider, ContentType, ContentTypeDecoder, FeeRateProvider,
};
use ckb_types::{
    bytes::Bytes,
    packed::{CellDep, OutPoint, Script},
    prelude::*,
};

/// Everything an operation needs besides its own parameters.
///
/// The context only borrows: one configuration and one set of collaborators
/// may serve any number of concurrent assemblies.
#[derive(Clone, Copy)]
pub struct SporeContext<'a> {
    pub config: &'a SporeConfig,
    pub cells: &'a dyn CellProvider,
    pub indexer: &'a dyn CellIndexer,
    pub content_types: &'a dyn ContentTypeDecoder,
    fee_rates: Option<&'a dyn FeeRateProvider>,
    fee_rate: Option<FeeRate>,
}

impl<'a> SporeContext<'a> {
    pub fn new(
        config: &'a SporeConfig,
        cells: &'a dyn CellProvider,
        indexer: &'a dyn CellIndexer,
        content_types: &'a dyn ContentTypeDecoder,
    ) -> Self {
        SporeContext {
            config,
            cells,
            indexer,
            content_types,
            fee_rates: None,
            fee_rate: None,
        }
    }

    /// Queries the pool for the fee rate of every assembly.
    pub fn with_fee_rate_provider(mut self, fee_rates: &'a dyn FeeRateProvider) -> Self {
        self.fee_rates = Some(fee_rates);
        self
    }

    /// Pays a fixed fee rate, taking precedence over the provider.
    pub fn with_fee_rate(mut self, fee_rate: FeeRate) -> Self {
        self.fee_rate = Some(fee_rate);
        self
    }

    pub fn fee_rate(&self) -> Result<FeeRate> {
        if let Some(fee_rate) = self.fee_rate {
            return Ok(fee_rate);
        }
        match self.fee_rates {
            Some(provider) => Ok(FeeRate::from_u64(provider.min_fee_rate()?)),
            None => Ok(DEFAULT_MIN_FEE_RATE),
        }
    }

    pub fn max_transaction_size(&self) -> Option<usize> {
        self.config.max_transaction_size
    }

    /// Fetches a cell that must still be live.
    pub fn live_cell(&self, out_point: &OutPoint) -> Result<Cell> {
        match self.cells.get_live_cell(out_point)? {
            (Some(cell), status) if status.is_live() => Ok(cell.with_out_point(out_point.clone())),
            (_, status) => Err(Error::not_found(format!(
                "cell {out_point} is not live ({status:?})"
            ))),
        }
    }

    /// Loads the live cell at `out_point`, which must be an object of
    /// `kind`, together with the deployment its type script belongs to.
    pub fn object_cell(
        &self,
        kind: ScriptKind,
        out_point: &OutPoint,
    ) -> Result<(Cell, &'a ScriptEntry)> {
        let cell = self.live_cell(out_point)?;
        let entry = self.entry_of(kind, &cell)?;
        Ok((cell, entry))
    }

    /// The deployment governing `cell`, which must be an object of `kind`.
    pub fn entry_of(&self, kind: ScriptKind, cell: &Cell) -> Result<&'a ScriptEntry> {
        let type_script = cell.type_().ok_or_else(|| {
            Error::invalid_reference(format!("cell has no type script, expect {}", kind.name()))
        })?;
        match self.config.find_by_script(&type_script) {
            Some((found, entry)) if found == kind => Ok(entry),
            Some((found, _)) => Err(Error::invalid_reference(format!(
                "expect a {} cell, found a {} cell",
                kind.name(),
                found.name()
            ))),
            None => Err(Error::invalid_reference(format!(
                "type script {} is not a {} script",
                type_script.code_hash(),
                kind.name()
            ))),
        }
    }

    /// Searches every deployment of `kind` for the live object `id`.
    ///
    /// Object ids lead the type script args, so the indexer is queried by
    /// args prefix.
    pub fn find_object(&self, kind: ScriptKind, id: &[u8; 32]) -> Result<(Cell, &'a ScriptEntry)> {
        for entry in self.config.entries(kind) {
            let script = entry.new_script(Bytes::copy_from_slice(id));
            if let Some(cell) = self.indexer.find_cell_by_type(&script)? {
                return Ok((cell, entry));
            }
        }
        Err(Error::not_found(format!(
            "{} {}",
            kind.name(),
            faster_hex::hex_string(id)
        )))
    }

    pub fn decode_content_type(&self, text: &str) -> Result<ContentType> {
        Ok(self.content_types.decode(text)?)
    }
}

/// A code cell dep pointing at `out_point`.
pub(crate) fn code_dep(out_point: OutPoint) -> CellDep {
    CellDep::new_builder()
        .out_point(out_point)
        .dep_type(ckb_types::core::DepType::Code.into())
        .build()
}

/// A live object cell used as a cell dep.
pub(crate) fn object_dep(cell: &Cell) -> Result<CellDep> {
    cell.out_point
        .clone()
        .map(code_dep)
        .ok_or_else(|| Error::invariant("a referenced object must be live"))
}

pub(crate) fn type_script_of(cell: &Cell) -> Result<Script> {
    cell.type_()
        .ok_or_else(|| Error::invariant("an object cell must carry a type script"))
}
