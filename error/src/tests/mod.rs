use crate::{CodecError, Error, ErrorKind};

#[test]
fn kind_follows_variant() {
    let cases = vec![
        (Error::not_found("cell"), ErrorKind::NotFound),
        (Error::unsupported("script"), ErrorKind::UnsupportedVersion),
        (Error::invalid_reference("cell"), ErrorKind::InvalidReference),
        (Error::invariant("no inputs"), ErrorKind::InvariantViolation),
        (
            Error::InsufficientPayment {
                required: 100,
                provided: 10,
            },
            ErrorKind::InsufficientPayment,
        ),
        (CodecError::OffsetsNotMatch.into(), ErrorKind::Decode),
        (anyhow::anyhow!("rpc down").into(), ErrorKind::Provider),
    ];
    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{error}");
    }
}

#[test]
fn capacity_overflow_is_converted() {
    let error: Error = ckb_occupied_capacity::Error::Overflow.into();
    assert_eq!(error.kind(), ErrorKind::CapacityOverflow);
}

#[test]
fn display_carries_amounts() {
    let error = Error::InsufficientCapacity {
        required: 6_100_000_000,
        available: 100,
    };
    assert_eq!(
        error.to_string(),
        "insufficient capacity: required 6100000000 shannons, available 100"
    );
}
