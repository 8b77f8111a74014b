//! Byte builders for synthetic `.sb` archives.
#![allow(dead_code)]

pub fn null() -> Vec<u8> {
    vec![1]
}

pub fn boolean(b: bool) -> Vec<u8> {
    vec![if b { 2 } else { 3 }]
}

pub fn int(v: i32) -> Vec<u8> {
    let mut out = vec![4];
    out.extend_from_slice(&v.to_be_bytes());
    out
}

pub fn float(v: f64) -> Vec<u8> {
    let mut out = vec![8];
    out.extend_from_slice(&v.to_be_bytes());
    out
}

fn counted(class_id: u8, bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![class_id];
    out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

pub fn string(s: &str) -> Vec<u8> {
    counted(9, s.as_bytes())
}

pub fn symbol(s: &str) -> Vec<u8> {
    counted(10, s.as_bytes())
}

pub fn utf8(s: &str) -> Vec<u8> {
    counted(14, s.as_bytes())
}

/// 1-based reference to a record of the same table.
pub fn reference(index: u32) -> Vec<u8> {
    let [_, a, b, c] = index.to_be_bytes();
    vec![99, a, b, c]
}

pub fn array(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![20];
    out.extend_from_slice(&(items.len() as i32).to_be_bytes());
    out.extend(items.concat());
    out
}

pub fn dictionary(pairs: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut out = vec![24];
    out.extend_from_slice(&(pairs.len() as i32).to_be_bytes());
    for (k, v) in pairs {
        out.extend_from_slice(k);
        out.extend_from_slice(v);
    }
    out
}

pub fn point(x: f64, y: f64) -> Vec<u8> {
    let mut out = vec![32];
    out.extend(float(x));
    out.extend(float(y));
    out
}

pub fn user_object(class_id: u8, version: u8, fields: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![class_id, version, fields.len() as u8];
    out.extend(fields.concat());
    out
}

/// `len` null fields with the given positions overridden.
pub fn fields(len: usize, set: Vec<(usize, Vec<u8>)>) -> Vec<Vec<u8>> {
    let mut out = vec![null(); len];
    for (i, f) in set {
        out[i] = f;
    }
    out
}

pub fn table(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"ObjS\x01Stch\x01".to_vec();
    out.extend_from_slice(&(records.len() as i32).to_be_bytes());
    out.extend(records.concat());
    out
}

pub fn archive(info: &[Vec<u8>], content: &[Vec<u8>]) -> Vec<u8> {
    let info = table(info);
    let content = table(content);
    let mut out = b"ScratchV02".to_vec();
    out.extend_from_slice(&((info.len() + content.len()) as i32).to_be_bytes());
    out.extend(info);
    out.extend(content);
    out
}
