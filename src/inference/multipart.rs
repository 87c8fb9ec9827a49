//! Minimal `multipart/form-data` encoding for a single file field.

use uuid::Uuid;

const CRLF: &str = "\r\n";

/// One file part wrapped in a form body.
pub(crate) struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Encoded body plus the matching `Content-Type` header value.
pub(crate) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub(crate) fn encode(part: &FilePart<'_>) -> MultipartBody {
    encode_with_boundary(part, &format!("scan-detect-{}", Uuid::new_v4().simple()))
}

fn encode_with_boundary(part: &FilePart<'_>, boundary: &str) -> MultipartBody {
    let head = format!(
        "--{boundary}{CRLF}\
         Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{CRLF}\
         Content-Type: {}{CRLF}{CRLF}",
        quote_safe(part.field),
        quote_safe(part.file_name),
        header_safe(part.content_type),
    );
    let tail = format!("{CRLF}--{boundary}--{CRLF}");
    let mut bytes = Vec::with_capacity(head.len() + part.bytes.len() + tail.len());
    bytes.extend_from_slice(head.as_bytes());
    bytes.extend_from_slice(part.bytes);
    bytes.extend_from_slice(tail.as_bytes());
    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

/// Escape quotes and drop line breaks so a value cannot end its header early.
fn quote_safe(value: &str) -> String {
    header_safe(value).replace('"', "%22")
}

fn header_safe(value: &str) -> String {
    value.chars().filter(|ch| *ch != '\r' && *ch != '\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part<'a>(file_name: &'a str, bytes: &'a [u8]) -> FilePart<'a> {
        FilePart {
            field: "file",
            file_name,
            content_type: "image/png",
            bytes,
        }
    }

    #[test]
    fn encodes_single_file_part() {
        let body = encode_with_boundary(&part("scan.png", b"PIXELS"), "XYZ");
        assert_eq!(body.content_type, "multipart/form-data; boundary=XYZ");
        let expected = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"scan.png\"\r\n\
            Content-Type: image/png\r\n\
            \r\n\
            PIXELS\r\n\
            --XYZ--\r\n";
        assert_eq!(String::from_utf8(body.bytes).unwrap(), expected);
    }

    #[test]
    fn sanitizes_file_name() {
        let body = encode_with_boundary(&part("a\"b\r\nc.png", b""), "B");
        let text = String::from_utf8(body.bytes).unwrap();
        assert!(text.contains("filename=\"a%22bc.png\""));
    }

    #[test]
    fn random_boundaries_differ() {
        let first = encode(&part("scan.png", b"x"));
        let second = encode(&part("scan.png", b"x"));
        assert_ne!(first.content_type, second.content_type);
        assert!(first.content_type.starts_with("multipart/form-data; boundary=scan-detect-"));
    }

    #[test]
    fn binary_payload_is_kept_verbatim() {
        let payload = [0u8, 255, 13, 10, 45, 45];
        let body = encode_with_boundary(&part("scan.png", &payload), "B");
        let start = body
            .bytes
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .unwrap()
            + 4;
        assert_eq!(&body.bytes[start..start + payload.len()], &payload);
    }
}
