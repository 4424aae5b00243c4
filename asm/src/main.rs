use arch::Arch;
use color_print::cformat;
use hcxasm::{assemble, error::Diag, error::Error, output};
use std::io::Write;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Output file (default: input name with the format's extension)
    #[clap(short, long)]
    output: Option<String>,

    /// Target architecture (HC4 or HC4E)
    #[clap(short, long, default_value = "HC4")]
    arch: String,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Binary)]
    format: Format,

    /// Dump the assembled code to stdout
    #[clap(short, long)]
    dump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    Binary,
    Ihex,
    Vhex,
    Text,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Binary => "bin",
            Format::Ihex | Format::Vhex => "hex",
            Format::Text => "txt",
        }
    }
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();

    let arch = match Arch::parse(&args.arch) {
        Ok(arch) => arch,
        Err(_) => {
            Diag::new(0, Error::UnsupportedArchitecture(args.arch.clone())).print(&args.input, &[]);
            std::process::exit(1);
        }
    };

    let source = std::fs::read_to_string(&args.input)
        .expect(&cformat!("<r,s>Failed to open file</>: {}", &args.input));
    let lines: Vec<String> = source.lines().map(str::to_string).collect();

    let code = match assemble(&source, arch) {
        Ok(code) => code,
        Err(diags) => {
            for diag in &diags {
                diag.print(&args.input, &lines);
            }
            eprintln!("{} error(s), no output written", diags.len());
            std::process::exit(1);
        }
    };

    let out_path = args.output.unwrap_or_else(|| {
        std::path::Path::new(&args.input)
            .with_extension(args.format.extension())
            .display()
            .to_string()
    });

    let mut file = std::fs::File::create(&out_path)
        .expect(&cformat!("<r,s>Failed to create file</>: {}", &out_path));
    let written = match args.format {
        Format::Binary => output::write_binary(&mut file, &code),
        Format::Ihex => output::write_ihex(&mut file, &code),
        Format::Vhex => output::write_vhex(&mut file, &code),
        Format::Text => output::write_text(&mut file, &code, &lines),
    };
    written.expect(&cformat!("<r,s>Failed to write file</>: {}", &out_path));
    file.flush()
        .expect(&cformat!("<r,s>Failed to write file</>: {}", &out_path));

    if args.dump {
        output::print_dump(&code, &lines, arch);
    }
    println!("{} > {} ({} bytes)", args.input, out_path, code.len());
}
