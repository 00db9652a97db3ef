pub fn run() -> anyhow::Result<()> {
    println!("dpsmeter {}", env!("CARGO_PKG_VERSION"));
    println!("Live DPS meter for game combat logs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
