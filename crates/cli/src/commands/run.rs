//! `fieldscout run` — Run a research task through the director loop.

use fieldscout_agents::{ResearchOrchestrator, generate_report};
use fieldscout_config::AppConfig;
use fieldscout_core::OutputMode;

pub async fn run(
    task: String,
    image: Option<String>,
    loops: Option<u32>,
    output: Option<String>,
    export: bool,
    summarize: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;

    if let Some(loops) = loops {
        config.research.max_loops = loops.max(1);
    }
    if let Some(mode) = output {
        config.research.output_type = mode.parse::<OutputMode>()?;
    }
    if export {
        config.research.export.enabled = true;
    }

    let director = super::llm_agent(&config)?;
    let research = config.research.clone();

    let mut orchestrator = ResearchOrchestrator::new(director.clone(), research.clone());
    let result = orchestrator.run(&task, image).await?;

    if summarize {
        let prompt = format!(
            "Condense the following research findings into a structured report:\n\n{result}"
        );
        let report = generate_report(
            director.as_ref(),
            &research.director_model_name,
            &prompt,
            research.director_max_tokens,
            None,
        )
        .await?;
        println!("{report}");
    } else {
        println!("{result}");
    }

    Ok(())
}
