use clap::builder::RangedU64ValueParser;
use clap::Parser;

pub const ITEM_COUNT: usize = 8096;
pub const ACCESS_COUNT: usize = 20_000_000;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Opt {
    #[clap(
        short = 'n',
        long = "items",
        default_value_t = ITEM_COUNT,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "number of booleans in each container"
    )]
    pub item_count: usize,

    #[clap(
        short = 'a',
        long = "accesses",
        default_value_t = ACCESS_COUNT,
        help = "number of random read/modify/write cycles per case"
    )]
    pub access_count: usize,

    #[clap(
        long,
        help = "seed for the index generator, defaults to a fresh OS entropy seed per run"
    )]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub item_count: usize,
    pub access_count: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            item_count: ITEM_COUNT,
            access_count: ACCESS_COUNT,
            seed: None,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Config {
            item_count: opt.item_count,
            access_count: opt.access_count,
            seed: opt.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_fixed_constants() {
        let config = Config::from(Opt::try_parse_from(["packed-bool-bench"]).unwrap());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_and_validation() {
        let opt = Opt::try_parse_from([
            "packed-bool-bench",
            "-n",
            "4",
            "--accesses",
            "6",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(
            Config::from(opt),
            Config {
                item_count: 4,
                access_count: 6,
                seed: Some(7),
            }
        );

        assert!(Opt::try_parse_from(["packed-bool-bench", "--items", "0"]).is_err());
    }

    #[test]
    fn item_count_must_fit_in_usize() {
        let max = usize::MAX.to_string();
        let opt = Opt::try_parse_from(["packed-bool-bench", "--items", max.as_str()]).unwrap();
        assert_eq!(opt.item_count, usize::MAX);

        assert!(Opt::try_parse_from(["packed-bool-bench", "--items", "-1"]).is_err());
        if usize::BITS < u64::BITS {
            let too_big = u64::MAX.to_string();
            let parsed = Opt::try_parse_from(["packed-bool-bench", "--items", too_big.as_str()]);
            assert!(parsed.is_err());
        }
    }
}
