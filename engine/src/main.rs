use std::error::Error;
use std::rc::Rc;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::task::{self, LocalSet};
use tracing::{error, info};
use wheel_engine::{config, logging, ChannelTrigger, ConsolePresentation, SpinEngine, SpinHooks, TimedAnimator};
use wheel_shared::WheelConfiguration;

const HELP: &str = "Enter: spin | <number>: spin to that prize | prizes | status | silent | reset | quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::setup()?;

    let loaded = config::load()?;
    match &loaded.path {
        Some(path) => info!("Loaded wheel config from {}", path.display()),
        None => info!("Using the built-in demo wheel"),
    }

    LocalSet::new().run_until(run(loaded.configuration)).await
}

fn demo_hooks() -> SpinHooks {
    SpinHooks::default()
        .on_start(|| {
            info!("Spinning...");
            Ok(())
        })
        .on_end(|prize, index| {
            info!("Landed on #{} {}", index, prize.name);
            Ok(())
        })
        .on_reset(|| {
            println!("  Press Enter to spin again.");
            Ok(())
        })
}

async fn run(configuration: WheelConfiguration) -> Result<(), Box<dyn Error>> {
    let animator = Rc::new(TimedAnimator::new());
    let presentation = Rc::new(ConsolePresentation::new());
    let trigger = Rc::new(ChannelTrigger::new());

    let engine = SpinEngine::builder(configuration)
        .animation(animator.clone())
        .presentation(presentation)
        .trigger(trigger.clone())
        .hooks(demo_hooks())
        .build()?;

    print_prizes(&engine);
    println!("{}", HELP);

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        match command {
            "" => {
                if !trigger.press() {
                    println!("  The wheel is busy.");
                }
            }
            "prizes" => print_prizes(&engine),
            "status" => {
                println!("  State: {} at {:.1}°", engine.state().label(), engine.current_rotation());
                if let Some(prize) = engine.current_prize() {
                    println!("  Last prize: {}", prize.name);
                }
            }
            "silent" => {
                let silent = !animator.is_silent();
                animator.set_reports_completion(!silent);
                println!("  Animation completion signal {}", if silent { "off" } else { "on" });
            }
            "reset" => engine.reset(),
            "quit" | "exit" => break,
            other => match other.parse::<usize>() {
                Ok(target) => match engine.spin(Some(target)) {
                    Some(completion) => {
                        task::spawn_local(async move {
                            if let Some(settlement) = completion.await {
                                match serde_json::to_string(&settlement) {
                                    Ok(json) => info!("Settlement: {}", json),
                                    Err(e) => error!("Could not encode settlement: {}", e),
                                }
                            }
                        });
                    }
                    None => println!("  The wheel is busy."),
                },
                Err(_) => println!("{}", HELP),
            },
        }
    }

    engine.destroy();
    Ok(())
}

fn print_prizes(engine: &SpinEngine) {
    for (index, prize) in engine.list_prizes().iter().enumerate() {
        let special = if engine.config().special_prize_index() == Some(index) {
            " ⭐"
        } else {
            ""
        };
        println!("  [{}] {}{}", index, prize.name, special);
    }
}
