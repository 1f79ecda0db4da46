use ckb_types::bytes::Bytes;

table_record! {
    /// The data carried by a spore cell.
    ///
    /// ```text
    /// table SporeData {
    ///     content_type: Bytes,
    ///     content: Bytes,
    ///     cluster_id: BytesOpt,
    /// }
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct SporeData {
        /// Canonical MIME-like content type, stored as raw UTF-8.
        pub content_type: String,
        pub content: Bytes,
        /// Type id of the cluster the spore belongs to.
        pub cluster_id: Option<[u8; 32]>,
    }
}
