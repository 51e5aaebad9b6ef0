use crate::behavior::bt::*;

/// Priority selector: ticks its children in order and settles on the first
/// one that does not fail.
pub struct BTSelector<T> {
    name: &'static str,
    nodes: Vec<BoxedNode<T>>,
    decorators: Vec<BoxedDecorator<T>>,
}

impl<T> BTSelector<T> {
    pub fn new(name: &'static str, nodes: Vec<BoxedNode<T>>) -> BTSelector<T> {
        BTSelector {
            name,
            decorators: Vec::<BoxedDecorator<T>>::new(),
            nodes,
        }
    }

    pub fn guarded<F>(mut self, predicate: F) -> BTSelector<T>
    where
        F: Fn(&T) -> Result<bool, DecisionError> + Send + Sync + 'static,
        T: 'static,
    {
        self.decorators.push(BTGuard::new(predicate));
        self
    }

    pub fn boxed(self) -> BoxedNode<T>
    where
        T: 'static,
    {
        Box::new(self)
    }
}

impl<T> BTNode<T> for BTSelector<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    fn get_decorators(&self) -> Iter<'_, BoxedDecorator<T>> {
        self.decorators.iter()
    }

    fn internal_tick(&mut self, blackboard: &mut T) -> TickResult {
        for node in &mut self.nodes {
            match node.tick(blackboard)? {
                BTResult::Failure => continue,
                settled => return Ok(settled),
            }
        }

        Ok(BTResult::Failure)
    }
}
