use alloy_rlp::{BufMut, Encodable};

/// RLP-encodes the provided value and prepends it with the provided ID.
pub fn enveloped<T: Encodable>(id: u8, v: &T, out: &mut dyn BufMut) {
    out.put_u8(id);
    v.encode(out);
}

/// RLP-encodes the provided value into a new buffer, prepended with the
/// provided ID.
pub fn envelop(id: u8, v: &impl Encodable) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + v.length());
    enveloped(id, v, &mut out);

    out
}
