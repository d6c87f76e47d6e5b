use super::UrlBuf;

/// Takes a set of sets of byte characters, return a 2^8 array with non-zero
/// values at the indices corresponding to the character byte values.
const fn char_table(sets: &[&[u8]]) -> [u8; 256] {
    let mut table = [0u8; 256];

    let mut i = 0;
    while i < sets.len() {
        let set: &[u8] = sets[i];

        let mut j = 0;
        while j < set.len() {
            let c: u8 = set[j];
            table[c as usize] = c;
            j += 1;
        }

        i += 1;
    }

    table
}

const ALPHA: &[u8] = &[
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L',
    b'M', b'N', b'O', b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X',
    b'Y', b'Z', b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j',
    b'k', b'l', b'm', b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v',
    b'w', b'x', b'y', b'z'
];

const DIGIT: &[u8] = &[
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9'
];

const PCT_ENCODED: &[u8] = &[
    b'%', b'A', b'B', b'C', b'D', b'E', b'F', b'a', b'b', b'c', b'd', b'e',
    b'f', b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9'
];

const SUB_DELIMS: &[u8] = &[
    b'!', b'$', b'&', b'\'', b'(', b')', b'*', b'+', b',', b';', b'='
];

const SCHEME_CHARS: [u8; 256] = char_table(&[
    ALPHA, DIGIT, &[b'+', b'-', b'.']
]);

const UNRESERVED: [u8; 256] = char_table(&[
    ALPHA, DIGIT, &[b'-', b'.', b'_', b'~']
]);

const REG_NAME_CHARS: [u8; 256] = char_table(&[
    &UNRESERVED, PCT_ENCODED, SUB_DELIMS
]);

pub const PATH_CHARS: [u8; 256] = char_table(&[
    &REG_NAME_CHARS, &[b':', b'@', b'/'],

    // NOTE: these are _not_ accepted in RFC 7230/3986. However, browsers
    // routinely send these unencoded, so allow them to support the real-world.
    &[b'[',  b']'],
]);

const QUERY_CHARS: [u8; 256] = char_table(&[
    &PATH_CHARS, &[b'/', b'?'],

    // NOTE: these are _not_ accepted in RFC 7230/3986. However, browsers
    // routinely send these unencoded, so allow them to support the real-world.
    &[b'{', b'}', b'[',  b']', b'\\',  b'^',  b'`', b'|'],
]);

const URL_CHARS: [u8; 256] = char_table(&[
    &SCHEME_CHARS, &QUERY_CHARS,

    // We allow fragments.
    &[b'#'],
]);

/// Characters left as-is when quoting a path for use in a URL.
const QUOTE_SAFE: [u8; 256] = char_table(&[&UNRESERVED, &[b'/']]);

#[inline(always)]
pub const fn is_url_char(&c: &u8) -> bool { URL_CHARS[c as usize] != 0 }

#[inline(always)]
const fn is_quote_safe(&c: &u8) -> bool { QUOTE_SAFE[c as usize] != 0 }

/// Percent-encodes every byte of `path` outside of the unreserved set and
/// `/`, yielding a valid [`Url`](super::Url).
///
/// ```rust
/// use folio::url::quote;
///
/// assert_eq!(quote("foo bar.html"), "foo%20bar.html");
/// assert_eq!(quote("a/b/c~d_e-f.g"), "a/b/c~d_e-f.g");
/// assert_eq!(quote("100%/é?"), "100%25/%C3%A9%3F");
/// ```
pub fn quote(path: &str) -> UrlBuf {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let bytes = path.as_bytes();
    if bytes.iter().all(is_quote_safe) {
        return UrlBuf::from(path.to_owned());
    }

    let mut quoted = String::with_capacity(bytes.len() + 8);
    for &b in bytes {
        if is_quote_safe(&b) {
            quoted.push(b as char);
        } else {
            quoted.push('%');
            quoted.push(HEX[(b >> 4) as usize] as char);
            quoted.push(HEX[(b & 0xF) as usize] as char);
        }
    }

    UrlBuf::from(quoted)
}

#[cfg(test)]
mod tests {
    fn test_char_table(table: &[u8]) {
        for (i, &v) in table.iter().enumerate() {
            if v != 0 {
                assert_eq!(i, v as usize);
            }
        }
    }

    #[test]
    fn check_tables() {
        test_char_table(&super::URL_CHARS[..]);
        test_char_table(&super::QUOTE_SAFE[..]);
    }

    #[test]
    fn quoted_output_is_a_valid_url() {
        let everything: String = (1u8..128).map(char::from).chain("ñ→".chars()).collect();
        let quoted = super::quote(&everything);
        assert!(quoted.bytes().all(|b| super::is_url_char(&b)));
        assert!(quoted.contains('/'));
        assert!(!quoted.contains(' '));
    }
}
