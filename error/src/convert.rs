use crate::Error;

impl From<ckb_occupied_capacity::Error> for Error {
    fn from(_error: ckb_occupied_capacity::Error) -> Self {
        Error::CapacityOverflow
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Provider(error)
    }
}
