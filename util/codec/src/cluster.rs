use ckb_types::bytes::Bytes;

use crate::{Codec, CodecError, CodecResult};

/// The layout revision of cluster data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClusterDataVersion {
    V1,
    V2,
}

table_record! {
    /// ```text
    /// table ClusterDataV1 {
    ///     name: Bytes,
    ///     description: Bytes,
    /// }
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct ClusterDataV1 {
        pub name: String,
        pub description: String,
    }
}

table_record! {
    /// ```text
    /// table ClusterDataV2 {
    ///     name: Bytes,
    ///     description: Bytes,
    ///     mutant_id: BytesOpt,
    /// }
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct ClusterDataV2 {
        pub name: String,
        pub description: String,
        /// A mutant every spore of this cluster is bound to.
        pub mutant_id: Option<[u8; 32]>,
    }
}

/// Cluster data of either layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterData {
    V1(ClusterDataV1),
    V2(ClusterDataV2),
}

impl ClusterData {
    pub fn version(&self) -> ClusterDataVersion {
        match self {
            ClusterData::V1(_) => ClusterDataVersion::V1,
            ClusterData::V2(_) => ClusterDataVersion::V2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ClusterData::V1(data) => &data.name,
            ClusterData::V2(data) => &data.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ClusterData::V1(data) => &data.description,
            ClusterData::V2(data) => &data.description,
        }
    }

    pub fn mutant_id(&self) -> Option<[u8; 32]> {
        match self {
            ClusterData::V1(_) => None,
            ClusterData::V2(data) => data.mutant_id,
        }
    }

    /// Converts into the given layout. Downgrading drops the mutant id and
    /// fails when one is set.
    pub fn into_version(self, version: ClusterDataVersion) -> CodecResult<Self> {
        match (self, version) {
            (ClusterData::V1(data), ClusterDataVersion::V2) => {
                Ok(ClusterData::V2(ClusterDataV2 {
                    name: data.name,
                    description: data.description,
                    mutant_id: None,
                }))
            }
            (ClusterData::V2(data), ClusterDataVersion::V1) => {
                if data.mutant_id.is_some() {
                    return Err(CodecError::FieldCountNotMatch {
                        expected: 2,
                        actual: 3,
                    });
                }
                Ok(ClusterData::V1(ClusterDataV1 {
                    name: data.name,
                    description: data.description,
                }))
            }
            (data, _) => Ok(data),
        }
    }

    pub fn pack(&self) -> Bytes {
        match self {
            ClusterData::V1(data) => data.pack(),
            ClusterData::V2(data) => data.pack(),
        }
    }

    /// Unpacks with an explicit layout, or tries V2 then V1 when the
    /// provenance of the bytes is unknown.
    pub fn unpack_versioned(
        slice: &[u8],
        version: Option<ClusterDataVersion>,
    ) -> CodecResult<Self> {
        match version {
            Some(ClusterDataVersion::V1) => ClusterDataV1::unpack(slice).map(ClusterData::V1),
            Some(ClusterDataVersion::V2) => ClusterDataV2::unpack(slice).map(ClusterData::V2),
            None => ClusterDataV2::unpack(slice)
                .map(ClusterData::V2)
                .or_else(|_| ClusterDataV1::unpack(slice).map(ClusterData::V1)),
        }
    }
}

impl From<ClusterDataV1> for ClusterData {
    fn from(data: ClusterDataV1) -> Self {
        ClusterData::V1(data)
    }
}

impl From<ClusterDataV2> for ClusterData {
    fn from(data: ClusterDataV2) -> Self {
        ClusterData::V2(data)
    }
}
