//
//  tfgit
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON output helpers.

use std::io::{self, Write};

use serde::Serialize;

/// Pretty-prints `value` to stdout.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

pub fn write_json_to<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::GitBlobRef;

    #[test]
    fn test_write_json_uses_wire_names() {
        let blob = GitBlobRef {
            object_id: "abc".to_string(),
            size: Some(3),
            url: None,
        };
        let mut out = Vec::new();
        write_json_to(&mut out, &blob).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"objectId\": \"abc\""));
        assert!(!text.contains("url"));
        assert!(text.ends_with("}\n"));
    }
}
