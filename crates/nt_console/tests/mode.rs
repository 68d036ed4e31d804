use anyhow::{anyhow, Result};
use nt_console::{Console, ConsoleConfig, ModeFlags, Stream};

mod common;
use common::{redirected, terminal, MemoryDriver};

/// Echo comes back after a failing operation
#[test]
fn test_echo_restored_after_error() {
    let mut console = terminal(80);
    let original = console.driver().current_attributes();

    let result: Result<()> = console.without_echo(|console| {
        let flags = console.driver().current_attributes().local_flags();
        assert!(!flags.contains(ModeFlags::ECHO));
        assert!(flags.contains(ModeFlags::ICANON));
        Err(anyhow!("bail"))
    });

    assert_eq!(result.unwrap_err().to_string(), "bail");
    assert_eq!(console.driver().current_attributes(), original);
}

/// Scopes nest and unwind in order
#[test]
fn test_nested_scopes() -> Result<()> {
    let driver = MemoryDriver::interactive().input(b"x");
    let mut console = Console::with_driver(driver, ConsoleConfig::default());
    let original = console.driver().current_attributes();

    console.without_echo(|console| {
        console.pending(&["working".into()], |_| Ok::<_, anyhow::Error>(()))?;
        let answer = console.ask(&["continue".into()], false)?;
        assert!(!answer);
        assert!(!console.driver().current_attributes().local_flags().contains(ModeFlags::ECHO));
        Ok::<_, anyhow::Error>(())
    })?;

    assert_eq!(console.driver().current_attributes(), original);
    Ok(())
}

/// Flags forced on and off are both applied
#[test]
fn test_flags_on_and_off() -> Result<()> {
    let mut console = terminal(80);
    {
        let guard = console.flags(ModeFlags::ECHONL, ModeFlags::ECHO | ModeFlags::ICANON)?;
        let flags = guard.driver().current_attributes().local_flags();
        assert!(flags.contains(ModeFlags::ECHONL));
        assert!(!flags.contains(ModeFlags::ECHO));
        assert!(!flags.contains(ModeFlags::ICANON));
        guard.restore()?;
    }
    assert!(console.driver().current_attributes().local_flags().contains(ModeFlags::ICANON));
    Ok(())
}

/// Nothing is touched when stdin is redirected
#[test]
fn test_redirected_stdin() -> Result<()> {
    let mut console = redirected();
    let ran = console.without_echo(|console| {
        Ok::<_, anyhow::Error>(console.is_interactive(Stream::Stdin))
    })?;
    assert!(!ran);
    assert!(console.driver().attribute_writes().is_empty());
    Ok(())
}
