use std::env;
use std::io;
use std::process;
use std::time::Duration;
use anyhow::Result;
use env_logger::Builder;
use gumdrop::Options;
use log::{debug, error, info, LevelFilter};
use rusoto_ec2::Ec2Client;
use rusoto_s3::S3Client;
use flowtop::config::Config;
use flowtop::decode::Substitution;
use flowtop::poll::{self, Poller};
use flowtop::provision::provision;
use flowtop::rank::Bound;
use flowtop::sink::Sink;
use flowtop::storage::S3Storage;
use flowtop::topology::Ec2Topology;

#[derive(Options)]
pub struct Args {
    #[options(help = "print help message")]
    help: bool,
    #[options(free, required, help = "AWS region")]
    region: String,
    #[options(free, required, help = "VPC to monitor")]
    vpc: String,
    #[options(free, required, help = "slowest flows to show per interval")]
    limit: usize,
    #[options(help = "flow log bucket, default <vpc>-vpc-flow-logs")]
    bucket: Option<String>,
    #[options(no_short, help = "custom AWS endpoint")]
    endpoint: Option<String>,
    #[options(help = "poll interval in seconds")]
    interval: Option<u64>,
    #[options(no_short, help = "batch download timeout in seconds")]
    timeout: Option<u64>,
    #[options(no_short, help = "re-resolve interface labels after seconds")]
    refresh: Option<u64>,
    #[options(no_short, help = "ignore batches older than seconds")]
    max_age: Option<u64>,
    #[options(no_short, help = "show limit + 1 flows")]
    inclusive: bool,
    #[options(no_short, help = "label addresses anywhere in the batch text")]
    textual: bool,
    #[options(no_short, help = "skip bucket and flow log creation")]
    no_provision: bool,
    #[options(help = "output sink: stdout[,color=false] or json[,pretty=true]")]
    sink: Option<Sink>,
    #[options(count, help = "increase log verbosity")]
    verbose: u32,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new(&self.region, &self.vpc, self.limit);
        let secs = Duration::from_secs;

        if let Some(bucket) = &self.bucket {
            config.bucket = bucket.clone();
        }

        config.endpoint  = self.endpoint.clone();
        config.interval  = self.interval.map(secs).unwrap_or(config.interval);
        config.timeout   = self.timeout.map(secs).unwrap_or(config.timeout);
        config.refresh   = self.refresh.map(secs);
        config.max_age   = self.max_age.map(secs);
        config.provision = !self.no_provision;

        if self.inclusive {
            config.bound = Bound::Inclusive;
        }

        if self.textual {
            config.substitution = Substitution::Text;
        }

        config
    }
}

#[tokio::main]
async fn main() {
    let args = parse();

    let mut builder = Builder::from_default_env();
    builder.filter(None, match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    builder.init();

    if let Err(e) = exec(args).await {
        debug!("{:?}", e);
        eprintln!("flowtop: {}", e);
        process::exit(1);
    }
}

async fn exec(mut args: Args) -> Result<()> {
    let config = args.config();
    config.validate()?;
    let region = config.region()?;
    let sink   = args.sink.take().unwrap_or_default();

    info!("monitoring {} in {}", config.vpc, config.region);

    let storage  = S3Storage::new(S3Client::new(region.clone()));
    let topology = Ec2Topology::new(Ec2Client::new(region));

    if config.provision {
        provision(&storage, &topology, &config.region, &config.vpc, &config.bucket).await?;
    }

    let (trigger, shutdown) = poll::shutdown();

    tokio::spawn(async move {
        if let Err(e) = terminated().await {
            error!("signal handler failed: {:?}", e);
            return;
        }
        info!("shutting down");
        trigger.fire();
    });

    Poller::new(storage, topology, &config, sink).run(shutdown).await?;

    Ok(())
}

fn parse() -> Args {
    let argv = env::args().skip(1).collect::<Vec<_>>();
    let usage = || {
        println!("Usage: flowtop [OPTIONS] REGION VPC LIMIT");
        println!();
        println!("{}", Args::usage());
    };

    match Args::parse_args_default(&argv) {
        Ok(args) if args.help_requested() => {
            usage();
            process::exit(0);
        }
        Ok(args) => args,
        Err(e)   => {
            eprintln!("flowtop: {}", e);
            usage();
            process::exit(2);
        }
    }
}

#[cfg(unix)]
async fn terminated() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;

    tokio::select! {
        r = tokio::signal::ctrl_c() => r,
        _ = term.recv()             => Ok(()),
    }
}

#[cfg(not(unix))]
async fn terminated() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
