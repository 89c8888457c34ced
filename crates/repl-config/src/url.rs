//! Target connection URL composition with percent-encoded credentials
//! (`spec.md` §4.1, tested property in §8).

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::RunConfig;

/// Everything outside RFC 3986's "unreserved" set (`A-Z a-z 0-9 - . _ ~`)
/// must be percent-encoded when a credential is embedded in a URL.
const CREDENTIAL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b':')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'[')
    .add(b']')
    .add(b'@')
    .add(b'!')
    .add(b'$')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'=')
    .add(b'%')
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn percent_encode_credential(value: &str) -> String {
    utf8_percent_encode(value, CREDENTIAL_ENCODE_SET).to_string()
}

impl RunConfig {
    /// The `postgres://` connection URL for the target, with username and
    /// password percent-encoded per the unreserved-character rule.
    pub fn target_connection_url(&self) -> String {
        format!(
            "postgres://{user}:{pass}@{host}:{port}/{db}{tls}",
            user = percent_encode_credential(&self.target_username),
            pass = percent_encode_credential(&self.target_password),
            host = self.target_host,
            port = self.target_port,
            db = self.target_name,
            tls = if self.target_tls_enabled { "?sslmode=require" } else { "?sslmode=disable" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_characters_are_percent_encoded() {
        let encoded = percent_encode_credential("p@ss:w/ord?#1");
        assert!(!encoded.contains('@'));
        assert!(!encoded.contains(':'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('?'));
        assert!(!encoded.contains('#'));
    }

    #[test]
    fn unreserved_characters_pass_through() {
        let encoded = percent_encode_credential("Abc-123._~");
        assert_eq!(encoded, "Abc-123._~");
    }
}
