use proptest::prelude::*;
use txcodec_eip4844::{
    BYTES_PER_BLOB, Blob, blob_from_bytes, default_kzg_settings, kzg_to_versioned_hash,
};
use txcodec_primitives::{Address, B256, Bytes, TxKind, U256, address, b256, hex};
use txcodec_rlp::RlpItem;
use txcodec_test_utils::secret_key::{SECRET_KEYS, secret_key_from_str};
use txcodec_transaction::{
    AccessListItem, AuthorizationTuple, DecodeError, DecodedTransaction, Eip1559, Eip2930,
    Eip4844, Eip7702, Legacy, RawTransaction, SignatureData, TransactionType, decode_transaction,
    decode_transaction_bytes, utils::envelop,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn values_are_send_and_sync() {
    assert_send_sync::<RawTransaction>();
    assert_send_sync::<DecodedTransaction>();
    assert_send_sync::<DecodeError>();
}

macro_rules! impl_test_encoding_round_trip {
    ($(
        $name:ident => $transaction:expr,
    )+) => {
        $(
            paste::item! {
                #[test]
                fn [<unsigned_encoding_round_trip_ $name>]() -> anyhow::Result<()> {
                    let transaction = RawTransaction::from($transaction);

                    let encoded = transaction.encode(None)?;
                    let decoded = decode_transaction_bytes(&encoded)?;

                    assert_eq!(decoded, DecodedTransaction::Unsigned(transaction));

                    Ok(())
                }

                #[test]
                fn [<signed_encoding_round_trip_ $name>]() -> anyhow::Result<()> {
                    let secret_key = secret_key_from_str(SECRET_KEYS[0])?;
                    let transaction = RawTransaction::from($transaction).sign(&secret_key, None)?;

                    let encoded = transaction.encode()?;
                    let decoded = decode_transaction(&hex::encode_prefixed(&encoded))?;

                    assert_eq!(decoded.transaction_type(), transaction.transaction_type());
                    assert_eq!(decoded, DecodedTransaction::Signed(transaction));

                    Ok(())
                }
            }
        )+
    };
}

impl_test_encoding_round_trip! {
    legacy => Legacy {
        nonce: 0,
        gas_price: 1,
        gas_limit: 2,
        kind: TxKind::Call(Address::default()),
        value: U256::from(3u64),
        input: Bytes::from(vec![1u8, 2]),
    },
    legacy_create => Legacy {
        nonce: 7,
        gas_price: 1,
        gas_limit: 2,
        kind: TxKind::Create,
        value: U256::MAX,
        input: Bytes::from(vec![0x60u8, 0x80]),
    },
    eip2930 => Eip2930 {
        chain_id: 1,
        nonce: 0,
        gas_price: 1,
        gas_limit: 2,
        kind: TxKind::Call(Address::default()),
        value: U256::from(3u64),
        input: Bytes::from(vec![1u8, 2]),
        access_list: vec![AccessListItem {
            address: address!("c014ba5ec014ba5ec014ba5ec014ba5ec014ba5e"),
            storage_keys: vec![B256::ZERO, B256::with_last_byte(1)],
        }],
    },
    eip1559 => Eip1559 {
        chain_id: 1,
        nonce: 0,
        max_priority_fee_per_gas: 1,
        max_fee_per_gas: 2,
        gas_limit: 3,
        kind: TxKind::Create,
        value: U256::from(4u64),
        input: Bytes::from(vec![1u8, 2]),
        access_list: Vec::new(),
    },
    eip4844 => Eip4844 {
        chain_id: 1,
        nonce: 0,
        max_priority_fee_per_gas: 1,
        max_fee_per_gas: 2,
        gas_limit: 3,
        kind: TxKind::Call(address!("c014ba5ec014ba5ec014ba5ec014ba5ec014ba5e")),
        value: U256::from(4u64),
        input: Bytes::from(vec![1u8, 2]),
        access_list: Vec::new(),
        max_fee_per_blob_gas: 7,
        blob_hashes: vec![
            b256!("01ae39c06daecb6a178655e3fab2e56bd61e81392027947529e4def3280c546e"),
            B256::with_last_byte(1),
        ],
        sidecar: None,
    },
    eip7702 => Eip7702 {
        chain_id: 1337,
        nonce: 0,
        max_priority_fee_per_gas: 1,
        max_fee_per_gas: 2,
        gas_limit: 3,
        kind: TxKind::Call(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
        value: U256::ZERO,
        input: Bytes::new(),
        access_list: Vec::new(),
        authorization_list: vec![AuthorizationTuple {
            chain_id: U256::ZERO,
            address: address!("1234567890123456789012345678901234567890"),
            nonce: U256::from(1u64),
            y_parity: 0,
            r: U256::from(1u64),
            s: U256::from(2u64),
        }],
    },
}

#[test]
fn minimal_buffers_select_their_type() -> anyhow::Result<()> {
    let cases: [(&str, TransactionType); 6] = [
        ("c6808080808080", TransactionType::Legacy),
        ("01c880808080808080c0", TransactionType::Eip2930),
        ("02c98080808080808080c0", TransactionType::Eip1559),
        ("03cb8080808080808080c080c0", TransactionType::Eip4844),
        ("03cfcb8080808080808080c080c0c0c0c0", TransactionType::Eip4844),
        ("04ca8080808080808080c0c0", TransactionType::Eip7702),
    ];

    for (encoded, expected) in cases {
        let decoded = decode_transaction(encoded)?;
        assert_eq!(decoded.transaction_type(), expected, "{encoded}");
        assert!(!decoded.is_signed());
    }

    Ok(())
}

#[test]
fn other_leading_byte_without_list_is_unsupported() {
    for leading_byte in [0x00u8, 0x05, 0x7f, 0x80, 0xb8] {
        assert_eq!(
            decode_transaction_bytes(&[leading_byte, 0x01]),
            Err(DecodeError::UnsupportedType(leading_byte))
        );
    }
}

#[test]
fn empty_input_is_malformed() {
    assert!(matches!(
        decode_transaction_bytes(&[]),
        Err(DecodeError::MalformedInput(_))
    ));
}

#[test]
fn eip1559_with_five_elements_is_malformed() {
    assert!(matches!(
        decode_transaction("02c58080808080"),
        Err(DecodeError::MalformedInput(_))
    ));
}

#[test]
fn truncated_input_is_malformed() {
    assert!(matches!(
        decode_transaction("02c9808080"),
        Err(DecodeError::MalformedInput(_))
    ));
}

#[test]
fn legacy_example_pads_trimmed_signature() -> anyhow::Result<()> {
    let r = b256!("00000000000000000000000000000000000000000000000000000000000000ab");
    let s = b256!("0000000000000000000000000000000000000000000000000000000000abcdef");

    let mut fields = vec![
        RlpItem::uint(0u64),
        RlpItem::uint(1u64),
        RlpItem::uint(21_000u64),
        RlpItem::bytes(address!("095e7baea6a6c7c4c2dfeb977efac326af552d87").to_vec()),
        RlpItem::uint(0u64),
        RlpItem::bytes(Bytes::new()),
    ];
    fields.extend([
        RlpItem::uint(27u64),
        RlpItem::bytes(vec![0xabu8]),
        RlpItem::bytes(vec![0xabu8, 0xcd, 0xef]),
    ]);
    let encoded = alloy_rlp::encode(RlpItem::List(fields));

    let decoded = decode_transaction_bytes(&encoded)?;
    assert_eq!(decoded.transaction_type(), TransactionType::Legacy);

    let signature = decoded
        .signature()
        .ok_or_else(|| anyhow::anyhow!("expected a signature"))?;
    assert_eq!(signature.v, Bytes::from(vec![27u8]));
    assert_eq!(signature.r, r);
    assert_eq!(signature.s, s);

    // Re-encoding trims the leading zeroes again
    assert_eq!(decoded.encode()?, Bytes::from(encoded));

    Ok(())
}

#[test]
fn typed_encoding_never_carries_leading_zeroes_in_r_and_s() -> anyhow::Result<()> {
    let transaction = RawTransaction::from(Eip1559 {
        chain_id: 1,
        ..Eip1559::default()
    });
    let signature = SignatureData::new(
        vec![28u8],
        B256::with_last_byte(0x01),
        b256!("00000000000000000000000000000000000000000000000000000000000000ff"),
    );

    let encoded = transaction.encode(Some(&signature))?;
    let (_, body) = encoded.split_at(1);
    let item = RlpItem::decode_exact(body)?;
    let items = item.as_list().unwrap_or_default();

    assert_eq!(items.get(9), Some(&RlpItem::bytes(vec![0x01u8])));
    assert_eq!(items.get(10), Some(&RlpItem::bytes(vec![0x01u8])));
    assert_eq!(items.get(11), Some(&RlpItem::bytes(vec![0xffu8])));

    let decoded = decode_transaction_bytes(&encoded)?;
    assert_eq!(decoded.signature(), Some(&signature));

    Ok(())
}

#[test]
fn legacy_private_transactions_are_unsigned() -> anyhow::Result<()> {
    let marker = RlpItem::bytes(b"restricted".to_vec());
    let unsigned = Legacy {
        gas_limit: 21_000,
        ..Legacy::default()
    };
    let payload = RawTransaction::Legacy(unsigned.clone()).signing_payload(None);
    let fields = RlpItem::decode_exact(&payload)?;

    for extra in [
        vec![RlpItem::bytes(vec![0x01u8]), marker.clone()],
        vec![
            RlpItem::bytes(vec![0x01u8]),
            RlpItem::bytes(vec![0x02u8]),
            marker.clone(),
        ],
    ] {
        let mut items = fields.as_list().unwrap_or_default().to_vec();
        items.extend(extra);
        let encoded = alloy_rlp::encode(RlpItem::List(items));

        let decoded = decode_transaction_bytes(&encoded)?;
        assert_eq!(
            decoded,
            DecodedTransaction::Unsigned(RawTransaction::Legacy(unsigned.clone()))
        );
    }

    Ok(())
}

#[test]
fn access_list_order_is_preserved() -> anyhow::Result<()> {
    let first = address!("0000000000000000000000000000000000000001");
    let second = address!("0000000000000000000000000000000000000002");
    let access_list = vec![
        AccessListItem {
            address: first,
            storage_keys: vec![B256::with_last_byte(2), B256::with_last_byte(1)],
        },
        AccessListItem {
            address: second,
            storage_keys: Vec::new(),
        },
        AccessListItem {
            address: first,
            storage_keys: vec![B256::with_last_byte(2)],
        },
    ];

    let transaction = RawTransaction::from(Eip2930 {
        chain_id: 1,
        access_list: access_list.clone(),
        ..Eip2930::default()
    });
    let decoded = decode_transaction_bytes(&transaction.encode(None)?)?;

    assert_eq!(decoded.transaction().access_list(), Some(access_list.as_slice()));

    Ok(())
}

fn blob(seed: u8) -> anyhow::Result<Box<Blob>> {
    let mut bytes = vec![0u8; BYTES_PER_BLOB];
    // Every field element must stay below the BLS modulus.
    for (index, chunk) in bytes.chunks_exact_mut(32).enumerate() {
        if let Some(last) = chunk.last_mut() {
            *last = seed.wrapping_add(index as u8);
        }
    }

    Ok(blob_from_bytes(&bytes)?)
}

#[test]
fn decodes_envelope_with_one_blob() -> anyhow::Result<()> {
    let transaction = Eip4844 {
        chain_id: 1,
        blob_hashes: vec![B256::with_last_byte(1)],
        ..Eip4844::default()
    };
    let payload = transaction.encode_payload(None)?;
    let (_, payload) = payload.split_at(1);

    let envelope = RlpItem::List(vec![
        RlpItem::decode_exact(payload)?,
        RlpItem::List(vec![RlpItem::bytes(vec![0u8; BYTES_PER_BLOB])]),
        RlpItem::List(vec![RlpItem::bytes(vec![0xc0u8; 48])]),
        RlpItem::List(vec![RlpItem::bytes(vec![0xc0u8; 48])]),
    ]);
    let encoded = envelop(Eip4844::TYPE, &envelope);

    let decoded = decode_transaction_bytes(&encoded)?;
    let RawTransaction::Eip4844(decoded_transaction) = decoded.transaction() else {
        anyhow::bail!("expected an EIP-4844 transaction");
    };
    let sidecar = decoded_transaction
        .sidecar
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("expected a sidecar"))?;
    assert_eq!(sidecar.len(), 1);
    assert!(
        sidecar
            .blobs()
            .iter()
            .all(|blob| blob.iter().all(|byte| *byte == 0))
    );

    assert_eq!(decoded.encode()?, Bytes::from(encoded));

    Ok(())
}

#[test]
fn blob_sidecar_stays_aligned_through_encoding() -> anyhow::Result<()> {
    let settings = default_kzg_settings();
    let transaction = Eip4844 {
        chain_id: 1,
        kind: TxKind::Call(Address::ZERO),
        ..Eip4844::default()
    }
    .with_blobs(vec![blob(1)?, blob(2)?, blob(3)?], settings)?;

    let sidecar = transaction
        .sidecar
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("expected a sidecar"))?;
    assert_eq!(sidecar.len(), 3);
    assert_eq!(sidecar.commitments().len(), 3);
    assert_eq!(sidecar.proofs().len(), 3);
    assert_eq!(transaction.blob_hashes.len(), 3);
    for (commitment, hash) in sidecar.commitments().iter().zip(&transaction.blob_hashes) {
        assert_eq!(kzg_to_versioned_hash(commitment), *hash);
    }

    transaction.verify_sidecar(settings)?;

    let secret_key = secret_key_from_str(SECRET_KEYS[1])?;
    let signed = RawTransaction::from(transaction).sign(&secret_key, None)?;
    let decoded = decode_transaction_bytes(&signed.encode()?)?;

    let RawTransaction::Eip4844(decoded_transaction) = decoded.transaction() else {
        anyhow::bail!("expected an EIP-4844 transaction");
    };
    decoded_transaction.verify_sidecar(settings)?;
    assert_eq!(decoded, DecodedTransaction::Signed(signed));

    Ok(())
}

prop_compose! {
    fn arb_eip1559()(
        chain_id in any::<u64>(),
        nonce in any::<u64>(),
        max_priority_fee_per_gas in any::<u128>(),
        max_fee_per_gas in any::<u128>(),
        gas_limit in any::<u64>(),
        to in proptest::option::of(any::<[u8; 20]>()),
        value in any::<[u8; 32]>(),
        input in proptest::collection::vec(any::<u8>(), 0..64),
        keys in proptest::collection::vec(any::<[u8; 32]>(), 0..4),
    ) -> Eip1559 {
        Eip1559 {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            kind: to.map_or(TxKind::Create, |to| TxKind::Call(Address::from(to))),
            value: U256::from_be_bytes(value),
            input: Bytes::from(input),
            access_list: vec![AccessListItem {
                address: Address::ZERO,
                storage_keys: keys.into_iter().map(B256::from).collect(),
            }],
        }
    }
}

proptest! {
    #[test]
    fn eip1559_decode_inverts_encode(
        transaction in arb_eip1559(),
        y_parity in any::<bool>(),
        r in any::<[u8; 32]>(),
        s in any::<[u8; 32]>(),
    ) {
        let transaction = RawTransaction::from(transaction);
        let v = if y_parity { 28u8 } else { 27u8 };
        let signature = SignatureData::new(vec![v], B256::from(r), B256::from(s));

        let encoded = transaction.encode(Some(&signature))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let decoded = decode_transaction_bytes(&encoded)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        prop_assert_eq!(decoded.transaction(), &transaction);
        prop_assert_eq!(decoded.signature(), Some(&signature));
    }
}
