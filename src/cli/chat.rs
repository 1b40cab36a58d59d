use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::core::AppConfig;
use crate::session::{Controller, Phase, Session};

/// Runs the two-phase chat loop: prompt for an API key until one
/// passes the probe, then trade messages with the provider. `/key`
/// returns to the key prompt, `/quit` (or Ctrl-C / Ctrl-D) exits.
pub async fn run(config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let controller = Controller::new(&config);
    let mut session = Session::new();

    // A key from the environment skips the first prompt when it works
    if let Some(key) = &config.api_key {
        controller.submit_api_key(&mut session, key).await;
        if session.phase() == Phase::AwaitingKey {
            println!("The key from OPENAI_API_KEY was rejected.");
        }
    }

    loop {
        match session.phase() {
            Phase::AwaitingKey => {
                let readline = rl.readline("API key: ");
                match readline {
                    Ok(line) => {
                        controller.submit_api_key(&mut session, &line).await;
                        if session.api_key_entered() && !session.api_key_valid() {
                            println!("Invalid API key. Please try again.");
                        } else if session.phase() == Phase::Chatting {
                            println!("Key accepted. Type /key to change it, /quit to exit.");
                        }
                    }
                    Err(ReadlineError::Interrupted) => break,
                    Err(ReadlineError::Eof) => break,
                    Err(err) => {
                        println!("Error: {:?}", err);
                        break;
                    }
                }
            }
            Phase::Chatting => {
                let readline = rl.readline(">>> ");
                match readline {
                    Ok(line) => match line.trim() {
                        "/quit" => break,
                        "/key" => {
                            controller.change_api_key(&mut session);
                        }
                        _ => {
                            let before = session.transcript().len();
                            controller.submit_message(&mut session, &line).await;
                            // Empty input appends nothing
                            if session.transcript().len() > before {
                                if let Some(reply) = session.transcript().iter().last() {
                                    println!("{}", reply.content);
                                }
                            }
                        }
                    },
                    Err(ReadlineError::Interrupted) => break,
                    Err(ReadlineError::Eof) => break,
                    Err(err) => {
                        println!("Error: {:?}", err);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
