use clap::{Arg, Command};
use std::sync::Arc;
use translingo::mt::{MockDetector, MockMode, MockProvider, TranslationProvider};
use translingo::{ResolverConfig, TranslationRequest, TranslationResolver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("translingo")
        .version("0.1.0")
        .about("Translate text through Google Translate, LibreTranslate and MyMemory")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .help("Target language code (e.g., fr, es, hi)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code, or 'auto' to detect (default: auto)")
                .default_value("auto"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use a mock provider instead of the public services")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show the provider chain, resolved source and confidence")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches.get_one::<String>("text").ok_or("missing text")?;
    let target_locale = matches
        .get_one::<String>("target-locale")
        .ok_or("missing target locale")?;
    let source_locale = matches
        .get_one::<String>("source-locale")
        .ok_or("missing source locale")?;
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");

    let _ = dotenvy::dotenv();
    if verbose {
        translingo::init_tracing("info");
    }

    let resolver = if use_mock {
        TranslationResolver::new(
            Some(Arc::new(MockDetector::default())),
            vec![Arc::new(MockProvider::new("Mock Translator", MockMode::Suffix))
                as Arc<dyn TranslationProvider>],
        )
    } else {
        TranslationResolver::from_config(&ResolverConfig::from_env()?)?
    };

    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!("🌍 {} → {}", source_locale, target_locale);
        println!("🔗 Providers: {}", resolver.provider_names().join(" → "));
        println!();
    }

    let request = TranslationRequest::new(text.as_str(), target_locale.as_str())
        .with_source(source_locale.as_str());
    let result = match resolver.resolve(&request).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Err(e.into());
        }
    };

    if verbose {
        println!("🔤 Detected source: {}", result.source_language);
        println!("📊 Confidence: {:.2}", result.confidence);
        println!();
    }
    println!("{}", result.translated_text);

    Ok(())
}
