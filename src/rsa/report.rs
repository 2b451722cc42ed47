// Key Generation Reporting
// Pluggable sinks for the primes and keys produced by the key generator

use std::io::Write;

use super::bigint::RsaBigInt;
use super::keygen::{RsaPrivateKey, RsaPublicKey};

/// Something observable during key generation
#[derive(Debug, Clone, Copy)]
pub enum KeyEvent<'a> {
    /// Both primes have been sampled
    PrimesGenerated { p: &'a RsaBigInt, q: &'a RsaBigInt },
    /// The key pair is complete
    KeysGenerated {
        public: &'a RsaPublicKey,
        private: &'a RsaPrivateKey,
    },
}

/// Receives key generation events
pub trait KeyReporter {
    fn report(&self, event: &KeyEvent<'_>);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl KeyReporter for NoopReporter {
    fn report(&self, _event: &KeyEvent<'_>) {}
}

/// Forwards events to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl KeyReporter for LogReporter {
    fn report(&self, event: &KeyEvent<'_>) {
        match event {
            KeyEvent::PrimesGenerated { p, q } => {
                log::info!("generated primes p={} q={}", p, q);
            }
            KeyEvent::KeysGenerated { public, private } => {
                log::info!("public key (e, n) = {}", public);
                log::info!("private key (d, n) = {}", private);
            }
        }
    }
}

/// Prints events to stdout for an operator watching the console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Write the operator lines for one event
    pub fn write_event<W: Write>(out: &mut W, event: &KeyEvent<'_>) -> std::io::Result<()> {
        match event {
            KeyEvent::PrimesGenerated { p, q } => {
                writeln!(out, "Key p: {}", p)?;
                writeln!(out, "Key q: {}", q)
            }
            KeyEvent::KeysGenerated { public, private } => {
                writeln!(out, "Public key (e, n): {}", public)?;
                writeln!(out, "Private key (d, n): {}", private)
            }
        }
    }
}

impl KeyReporter for ConsoleReporter {
    fn report(&self, event: &KeyEvent<'_>) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = Self::write_event(&mut out, event) {
            log::warn!("failed to report key event: {}", e);
        }
    }
}

impl<F> KeyReporter for F
where
    F: Fn(&KeyEvent<'_>),
{
    fn report(&self, event: &KeyEvent<'_>) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::keygen::RsaKeyPair;
    use std::cell::RefCell;

    #[test]
    fn test_console_lines() {
        let keypair = RsaKeyPair::from_primes(&from_u64(61), &from_u64(53), &from_u64(17)).unwrap();
        let mut out = Vec::new();

        ConsoleReporter::write_event(
            &mut out,
            &KeyEvent::PrimesGenerated { p: &from_u64(61), q: &from_u64(53) },
        )
        .unwrap();
        ConsoleReporter::write_event(
            &mut out,
            &KeyEvent::KeysGenerated {
                public: &keypair.public_key,
                private: &keypair.private_key,
            },
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Key p: 61\nKey q: 53\nPublic key (e, n): (17, 3233)\nPrivate key (d, n): (2753, 3233)\n"
        );
    }

    fn reporter_fn<F: Fn(&KeyEvent<'_>)>(f: F) -> F {
        f
    }

    #[test]
    fn test_closure_reporter() {
        let seen = RefCell::new(Vec::new());
        let reporter = reporter_fn(|event| {
            if let KeyEvent::PrimesGenerated { p, .. } = event {
                seen.borrow_mut().push((*p).clone());
            }
        });

        reporter.report(&KeyEvent::PrimesGenerated { p: &from_u64(5), q: &from_u64(7) });
        NoopReporter.report(&KeyEvent::PrimesGenerated { p: &from_u64(11), q: &from_u64(13) });

        assert_eq!(seen.into_inner(), vec![from_u64(5)]);
    }
}
