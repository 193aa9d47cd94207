//! Relationship demo command

use super::CommandResult;
use crate::config::AppConfig;
use clap::{Args, ValueEnum};
use lazylift_core::{run_all, run_demo, DemoKind, DemoOptions};
use std::io::Write;

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Demo to run
    #[arg(value_enum, default_value_t = DemoTarget::All)]
    pub kind: DemoTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoTarget {
    All,
    OneToMany,
    ParentChild,
    NullableManyToOne,
    OneToOne,
    OneToOneLinked,
    ManyToMany,
    ExerciseCatalog,
    SelfReferential,
}

impl DemoTarget {
    fn kind(self) -> Option<DemoKind> {
        match self {
            Self::All => None,
            Self::OneToMany => Some(DemoKind::OneToMany),
            Self::ParentChild => Some(DemoKind::ParentChild),
            Self::NullableManyToOne => Some(DemoKind::NullableManyToOne),
            Self::OneToOne => Some(DemoKind::OneToOne),
            Self::OneToOneLinked => Some(DemoKind::OneToOneLinked),
            Self::ManyToMany => Some(DemoKind::ManyToMany),
            Self::ExerciseCatalog => Some(DemoKind::ExerciseCatalog),
            Self::SelfReferential => Some(DemoKind::SelfReferential),
        }
    }
}

pub fn execute(args: DemoArgs, config: &AppConfig, out: &mut dyn Write) -> CommandResult {
    let options = DemoOptions {
        echo_sql: config.echo_sql,
    };
    match args.kind.kind() {
        Some(kind) => run_demo(kind, options, out)?,
        None => run_all(options, out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, DemoArgs, DemoTarget};
    use crate::config::AppConfig;
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            log_dir: PathBuf::from("/tmp/lazylift-test-logs"),
            echo_sql: false,
        }
    }

    #[test]
    fn single_demo_prints_only_its_own_output() {
        let mut out = Vec::new();
        execute(
            DemoArgs {
                kind: DemoTarget::OneToOne,
            },
            &config(),
            &mut out,
        )
        .expect("single demo");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert!(text.contains("London"));
        assert!(!text.contains("=="));
    }

    #[test]
    fn all_prints_a_header_per_demo() {
        let mut out = Vec::new();
        execute(
            DemoArgs {
                kind: DemoTarget::All,
            },
            &config(),
            &mut out,
        )
        .expect("all demos");

        let text = String::from_utf8(out).expect("utf-8 output");
        let headers = text.lines().filter(|line| line.starts_with("== ")).count();
        assert_eq!(headers, lazylift_core::DemoKind::ALL.len());
    }
}
