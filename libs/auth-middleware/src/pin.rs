use rand::Rng;

pub const PIN_LENGTH: usize = 6;

/// Source of verification PINs. A trait so tests and flows that need a fixed
/// PIN can swap in a deterministic implementation.
pub trait PinGenerator {
    fn generate(&self) -> String;
}

/// Uniformly random zero-padded 6-digit PIN.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPinGenerator;

impl PinGenerator for RandomPinGenerator {
    fn generate(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{n:06}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_are_six_digits() {
        let gen = RandomPinGenerator;
        for _ in 0..100 {
            let pin = gen.generate();
            assert_eq!(pin.len(), PIN_LENGTH);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn pins_vary() {
        let gen = RandomPinGenerator;
        let pins: std::collections::HashSet<_> = (0..50).map(|_| gen.generate()).collect();
        assert!(pins.len() > 1);
    }
}
