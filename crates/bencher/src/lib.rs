use micro_content::Charset;

#[derive(Debug, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    charset: Charset,
    payload: TestPayload,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, charset: Charset, payload: TestPayload) -> Self {
        Self { name, group, charset, payload }
    }

    pub fn small(name: &'static str, charset: Charset, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Small, charset, payload)
    }

    pub fn normal(name: &'static str, charset: Charset, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Normal, charset, payload)
    }

    pub fn large(name: &'static str, charset: Charset, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Large, charset, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn payload(&self) -> &TestPayload {
        &self.payload
    }
}

/// A benchmark payload built by repeating a seed string.
#[derive(Debug, Clone)]
pub struct TestPayload {
    text: String,
}

impl TestPayload {
    pub fn repeated(seed: &str, times: usize) -> Self {
        Self { text: seed.repeat(times) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
