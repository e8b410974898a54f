// * Shared fakes for the model layer: a code-point tokenizer, a scripted model and a counting loader.
#![allow(dead_code)]

use page_brief::model::{
    BoxError, Capability, CausalModel, ChatMlTemplate, GenerationConfig, LoadError, ModelLoader,
    TextTokenizer,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// * First id past the Unicode range; treated as a special (control) token
pub const STOP_TOKEN: u32 = 0x11_0000;

#[derive(Debug, Default)]
pub struct Tally {
    pub encodes: AtomicUsize,
    pub generations: AtomicUsize,
    pub last_max_new_tokens: AtomicUsize,
    pub in_flight: AtomicBool,
    pub overlaps: AtomicUsize,
}

impl Tally {
    pub fn encodes(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }

    pub fn generations(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }
}

pub struct CharTokenizer {
    tally: Arc<Tally>,
    fail: bool,
}

impl TextTokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
        self.tally.encodes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("vocabulary exploded".into());
        }
        Ok(text.chars().map(|c| c as u32).collect())
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, BoxError> {
        let mut out = String::new();
        for &id in ids {
            if id >= STOP_TOKEN {
                if !skip_special_tokens {
                    out.push_str("<|im_end|>");
                }
                continue;
            }
            out.push(char::from_u32(id).ok_or("invalid code point")?);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Prompt, then the reply, then a stop token
    Echo,
    /// Returns fewer tokens than the prompt
    Truncated,
    /// Generation itself errors
    Fail,
    /// Like Echo but sleeps while holding the model
    Slow,
}

pub struct ScriptedModel {
    reply: String,
    behavior: Behavior,
    tally: Arc<Tally>,
}

impl CausalModel for ScriptedModel {
    fn generate(&mut self, prompt: &[u32], config: &GenerationConfig) -> Result<Vec<u32>, BoxError> {
        if self.tally.in_flight.swap(true, Ordering::SeqCst) {
            self.tally.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.tally.generations.fetch_add(1, Ordering::SeqCst);
        self.tally
            .last_max_new_tokens
            .store(config.max_new_tokens, Ordering::SeqCst);

        let result = match self.behavior {
            Behavior::Fail => Err("device lost".into()),
            Behavior::Truncated => Ok(prompt[..prompt.len() / 2].to_vec()),
            Behavior::Echo | Behavior::Slow => {
                if self.behavior == Behavior::Slow {
                    std::thread::sleep(Duration::from_millis(20));
                }
                let mut out = prompt.to_vec();
                out.extend(
                    self.reply
                        .chars()
                        .take(config.max_new_tokens.saturating_sub(1))
                        .map(|c| c as u32),
                );
                out.push(STOP_TOKEN);
                Ok(out)
            }
        };

        self.tally.in_flight.store(false, Ordering::SeqCst);
        result
    }
}

pub struct FakeScript {
    pub reply: String,
    pub behavior: Behavior,
    pub fail_tokenize: bool,
}

impl FakeScript {
    pub fn echo(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            behavior: Behavior::Echo,
            fail_tokenize: false,
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing_tokenizer(mut self) -> Self {
        self.fail_tokenize = true;
        self
    }
}

pub fn fake_capability(script: &FakeScript, tally: Arc<Tally>) -> Capability {
    Capability::new(
        "fake/char-model",
        "cpu",
        Box::new(CharTokenizer {
            tally: Arc::clone(&tally),
            fail: script.fail_tokenize,
        }),
        Box::new(ChatMlTemplate),
        Box::new(ScriptedModel {
            reply: script.reply.clone(),
            behavior: script.behavior,
            tally,
        }),
    )
}

pub struct FakeLoader {
    pub loads: AtomicUsize,
    pub failure: Option<LoadError>,
    pub script: FakeScript,
    pub tally: Arc<Tally>,
}

impl FakeLoader {
    pub fn succeeding(reply: &str) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            failure: None,
            script: FakeScript::echo(reply),
            tally: Arc::new(Tally::default()),
        }
    }

    pub fn failing(error: LoadError) -> Self {
        Self {
            failure: Some(error),
            ..Self::succeeding("")
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for FakeLoader {
    fn load(&self) -> Result<Capability, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(fake_capability(&self.script, Arc::clone(&self.tally))),
        }
    }
}

pub fn article_html(paragraphs: usize) -> String {
    let mut body = String::from("<nav><a href=\"/\">Home</a><a href=\"/about\">About us</a></nav>");
    body.push_str("<h1>Local Models Summarize The Open Web Quietly</h1>");
    for i in 0..paragraphs {
        body.push_str(&format!(
            "<p>Paragraph number {} explains one more detail of how the page text is gathered and bounded.</p>",
            i
        ));
    }
    body.push_str("<footer>Copyright 2024 Example Media. All rights reserved.</footer>");
    format!("<html><head><title>t</title><script>track()</script></head><body>{}</body></html>", body)
}
